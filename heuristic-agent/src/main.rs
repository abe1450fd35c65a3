use game_def::{ai_from_function, Action};
use heuristic_agent::HeuristicAgent;

fn main() -> anyhow::Result<()> {
    let agent = HeuristicAgent::default();
    ai_from_function(|state| {
        agent
            .decide(&state)
            .map_or(Action::Take, |decision| decision.action)
    })
}
