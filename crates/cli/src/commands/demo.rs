//! `relayclaw demo`: run the sample queries, one conversation each.

use relayclaw_core::message::{Conversation, Message};
use tracing::info;

pub const DEMO_QUERIES: [&str; 4] = [
    "What's 17% of 420?",
    "Convert 100°F to Celsius.",
    "How many seconds are there in 3.5 days?",
    "What is the capital of France?",
];

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (config, agent) = super::build_agent()?;
    info!(model = %config.model, queries = DEMO_QUERIES.len(), "Running demo");

    for query in DEMO_QUERIES {
        println!();
        println!("User: {query}");

        let mut conv = Conversation::new();
        conv.push(Message::user(query));
        let result = agent.run_turn(&mut conv).await;

        println!("Final Answer: {}", result.text());
    }

    Ok(())
}
