use std::{
    io::{BufRead, BufReader, Write},
    process::{Child, ChildStdin, ChildStdout, Stdio},
};

use anyhow::{bail, Context};
use clap_repl::{ClapEditor, ReadCommandOutput};
use game_def::{Action, GameState};
use heuristic_agent::HeuristicAgent;
use tracing::{debug, info};

/// Who decides for a seat.
pub enum Agent {
    Heuristic {
        name: String,
        engine: HeuristicAgent,
    },
    Human {
        name: String,
        editor: ClapEditor<Action>,
    },
    /// External program speaking one JSON line per turn.
    AI {
        process: Child,
        reader: BufReader<ChildStdout>,
        writer: ChildStdin,
        name: String,
    },
}

impl Agent {
    /// Parses a seat argument: `heuristic`, `human-<name>`, or a path to an agent executable.
    pub fn from_arg(arg: &str, seat: usize) -> anyhow::Result<Self> {
        if arg == "heuristic" {
            return Ok(Agent::heuristic(format!("Heuristic {seat}")));
        }
        if let Some(name) = arg.strip_prefix("human-") {
            return Ok(Agent::Human {
                name: format!("Human {name} {seat}"),
                editor: ClapEditor::<Action>::builder().build(),
            });
        }
        let mut process = std::process::Command::new(arg)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start agent {arg}"))?;
        let reader = BufReader::new(process.stdout.take().context("Agent has no stdout")?);
        let writer = process.stdin.take().context("Agent has no stdin")?;
        Ok(Agent::AI {
            process,
            reader,
            writer,
            name: format!("AI {arg} {seat}"),
        })
    }

    pub fn heuristic(name: String) -> Self {
        Agent::Heuristic {
            name,
            engine: HeuristicAgent::default(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Agent::Heuristic { name, .. } | Agent::Human { name, .. } | Agent::AI { name, .. } => {
                name
            }
        }
    }

    /// Picks an action for the acting player of `state`.
    pub fn act(&mut self, state: &GameState) -> anyhow::Result<Action> {
        match self {
            Agent::Heuristic { engine, .. } => {
                let decision = engine
                    .decide(state)
                    .context("Game state has no acting player")?;
                debug!("Rule {:?} decided {:?}", decision.rule, decision.action);
                Ok(decision.action)
            }
            Agent::Human { editor, .. } => {
                state.print();
                loop {
                    match editor.read_command() {
                        ReadCommandOutput::Command(action) => return Ok(action),
                        ReadCommandOutput::EmptyLine => (),
                        ReadCommandOutput::ClapError(e) => {
                            e.print()?;
                        }
                        ReadCommandOutput::ShlexError => {
                            println!("Error: input was not valid and could not be processed");
                        }
                        ReadCommandOutput::ReedlineError(e) => {
                            bail!("Line editor failed: {e}");
                        }
                        ReadCommandOutput::CtrlC | ReadCommandOutput::CtrlD => {
                            bail!("End game requested by human player");
                        }
                    }
                }
            }
            Agent::AI {
                writer,
                reader,
                name,
                ..
            } => {
                info!("{name} thinking...");
                writeln!(writer, "{}", state.json()?).context("Agent stopped reading")?;
                writer.flush()?;
                let mut result = String::new();
                if reader.read_line(&mut result)? == 0 {
                    bail!("Agent {name} exited");
                }
                serde_json::from_str(&result)
                    .with_context(|| format!("Agent {name} sent an invalid action: {}", result.trim()))
            }
        }
    }
}

impl Drop for Agent {
    fn drop(&mut self) {
        if let Agent::AI { process, .. } = self {
            let _ = process.kill();
            let _ = process.wait();
        }
    }
}
