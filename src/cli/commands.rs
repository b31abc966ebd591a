//! CLI command handlers. All asynchronous work goes through a [`Bridge`].

use std::sync::Arc;

use serde_json::json;

use super::{ThinkArgs, ToolsArgs};
use crate::bridge::Bridge;
use crate::config::AppConfig;
use crate::mcp::ServerSpec;
use crate::thinking::shared_log;
use crate::tools::{
    McpSequentialThinkingTool, ThinkStepTool, ThinkingSummaryTool, Tool, ToolArguments,
};

const DEMO_THOUGHTS: [&str; 3] = [
    "Define the problem: what exactly has to be decided, and by when?",
    "Compare the options against the constraints that matter most.",
    "Conclude with the option that satisfies every hard constraint.",
];

/// Handle `mcp-bridge think`.
pub fn handle_think(args: ThinkArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    let thoughts: Vec<String> = if args.thoughts.is_empty() {
        DEMO_THOUGHTS.iter().map(|t| t.to_string()).collect()
    } else {
        args.thoughts
    };
    let total = thoughts.len();
    let log = shared_log();

    if args.local {
        let tool = ThinkStepTool::new(Arc::clone(&log));
        for (index, thought) in thoughts.iter().enumerate() {
            let output = tool.run(&ToolArguments::new(json!({
                "thought": thought,
                "step_number": index + 1,
                "total_steps": total,
            })));
            println!("{output}\n");
        }
    } else {
        let spec = match args.server_script {
            Some(script) => ServerSpec::script(script),
            None => config.thinking_server(),
        };
        println!("🔌 Starting {}", spec.display_command());
        let bridge = Arc::new(Bridge::for_server(spec).with_timeouts(config.timeouts));
        bridge.start()?;

        let tool = McpSequentialThinkingTool::new(Arc::clone(&bridge), Arc::clone(&log));
        for (index, thought) in thoughts.iter().enumerate() {
            let output = tool.run(&ToolArguments::new(json!({
                "thought": thought,
                "thought_number": index + 1,
                "total_thoughts": total,
                "next_thought_needed": index + 1 < total,
            })));
            println!("{output}\n");
        }
        bridge.stop();
    }

    let summary = ThinkingSummaryTool::new(log);
    println!("{}", summary.run(&ToolArguments::default()));
    Ok(())
}

/// Handle `mcp-bridge tools <preset>`.
pub fn handle_tools(args: ToolsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    let workdir = match args.workdir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let spec = args.preset.spec(&workdir);

    println!("🔌 Starting {}", spec.display_command());
    let bridge = Bridge::for_server(spec).with_timeouts(config.timeouts);
    bridge.start()?;
    let tools = bridge.list_tools();
    bridge.stop();
    let tools = tools?;

    println!("🧰 {} exposes {} tools:", args.preset, tools.len());
    for tool in &tools {
        println!("  • {tool}");
    }
    Ok(())
}

/// Handle `mcp-bridge config`.
pub fn handle_config() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    println!("🔧 Configuration:");
    for line in config.describe().lines() {
        println!("  {line}");
    }
    config.validate()?;
    println!("✅ Configuration is valid!");
    Ok(())
}
