//! Thinking tools: a local step recorder and an MCP-backed
//! sequential-thinking tool, sharing one step log.

use std::collections::BTreeMap;
#[cfg(feature = "mcp")]
use std::sync::Arc;
use std::sync::{MutexGuard, PoisonError};

use super::arguments::ToolArguments;
use super::tool::Tool;
use super::types::ToolParameters;
use crate::config::AppConfig;
#[cfg(feature = "mcp")]
use crate::error::BridgeError;
use crate::error::Result;
use crate::thinking::{SharedStepLog, StepLog};
#[cfg(feature = "mcp")]
use crate::{
    bridge::Bridge,
    mcp::{MCPClient, ThoughtRequest},
};

const THOUGHT_PREVIEW_CHARS: usize = 100;
const DIVIDER_WIDTH: usize = 50;
const DEFAULT_TOTAL_STEPS: u32 = 5;
const MAX_BAR_CELLS: u64 = 20;

fn lock(log: &SharedStepLog) -> MutexGuard<'_, StepLog> {
    log.lock().unwrap_or_else(PoisonError::into_inner)
}

/// First 100 characters of `thought`, with an ellipsis when cut.
fn preview(thought: &str) -> String {
    let mut chars = thought.chars();
    let head: String = chars.by_ref().take(THOUGHT_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// One cell per step up to `MAX_BAR_CELLS`; longer plans are scaled down.
fn progress_bar(step_number: u32, total_steps: u32) -> String {
    let done = u64::from(step_number.min(total_steps));
    let total = u64::from(total_steps);
    let width = total.min(MAX_BAR_CELLS);
    let filled = done * width / total;
    let percent = u64::from(step_number) * 100 / total;
    format!(
        "[{}{}] {percent}%",
        "█".repeat(filled as usize),
        "░".repeat((width - filled) as usize)
    )
}

/// Records one reasoning step in the step log and reports progress.
pub struct ThinkStepTool {
    log: SharedStepLog,
    parameters: ToolParameters,
}

impl ThinkStepTool {
    pub const NAME: &'static str = "think_step";

    pub fn new(log: SharedStepLog) -> Self {
        Self {
            log,
            parameters: ToolParameters::object()
                .string("thought", "Your analysis for this step", true)
                .positive_integer("step_number", "Current step (1, 2, 3, ...)", true)
                .positive_integer_or("total_steps", "Planned number of steps", DEFAULT_TOTAL_STEPS)
                .string("context", "Category or extra context for this step", false)
                .build(),
        }
    }
}

impl Tool for ThinkStepTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Record one step of structured, step-by-step reasoning. Break a complex \
         problem into numbered steps and call this once per step."
    }

    fn parameters(&self) -> &ToolParameters {
        &self.parameters
    }

    fn execute(&self, args: &ToolArguments) -> Result<String> {
        let thought = args.get_str("thought")?;
        let step_number = args.get_u32("step_number")?;
        let total_steps = args.get_u32_or("total_steps", DEFAULT_TOTAL_STEPS)?;
        let context = args.get_str_opt("context");

        let metadata = context.map(|context| {
            BTreeMap::from([("context".to_string(), serde_json::Value::from(context))])
        });

        let recorded = {
            let mut log = lock(&self.log);
            log.add_step(thought, step_number, total_steps, metadata);
            log.len()
        };
        tracing::debug!(step_number, total_steps, steps = recorded, "thinking step recorded");

        let mut lines = vec![
            format!("✓ Step {step_number}/{total_steps} recorded"),
            progress_bar(step_number, total_steps),
            String::new(),
            format!("💭 {}", preview(thought)),
        ];
        if let Some(context) = context {
            lines.push(format!("📑 Context: {context}"));
        }

        if step_number == total_steps {
            let divider = "─".repeat(DIVIDER_WIDTH);
            lines.push(String::new());
            lines.push(divider.clone());
            lines.push("✅ Thinking process complete!".to_string());
            lines.push(format!("📊 Total steps: {recorded}"));
            lines.push(divider);
        } else {
            lines.push(String::new());
            lines.push(format!("→ Moving on to step {}", step_number.saturating_add(1)));
        }

        Ok(lines.join("\n"))
    }
}

/// Returns the full summary of the recorded steps.
pub struct ThinkingSummaryTool {
    log: SharedStepLog,
    parameters: ToolParameters,
}

impl ThinkingSummaryTool {
    pub const NAME: &'static str = "get_thinking_summary";

    pub fn new(log: SharedStepLog) -> Self {
        Self {
            log,
            parameters: ToolParameters::empty(),
        }
    }
}

impl Tool for ThinkingSummaryTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Summarize every recorded thinking step. Use after the final step to review the analysis."
    }

    fn parameters(&self) -> &ToolParameters {
        &self.parameters
    }

    fn execute(&self, _args: &ToolArguments) -> Result<String> {
        Ok(lock(&self.log).summary())
    }
}

/// Clears the step log before a new task.
pub struct ClearThinkingTool {
    log: SharedStepLog,
    parameters: ToolParameters,
}

impl ClearThinkingTool {
    pub const NAME: &'static str = "clear_thinking";

    pub fn new(log: SharedStepLog) -> Self {
        Self {
            log,
            parameters: ToolParameters::empty(),
        }
    }
}

impl Tool for ClearThinkingTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Discard all recorded thinking steps before starting a new analysis."
    }

    fn parameters(&self) -> &ToolParameters {
        &self.parameters
    }

    fn execute(&self, _args: &ToolArguments) -> Result<String> {
        let removed = lock(&self.log).reset();
        Ok(format!("✓ Thinking process cleared. Removed {removed} steps."))
    }
}

/// Forwards thoughts to a sequential-thinking MCP server through a bridge,
/// mirroring each accepted thought into the step log.
///
/// The bridge is started on first use.
#[cfg(feature = "mcp")]
pub struct McpSequentialThinkingTool {
    bridge: Arc<Bridge<MCPClient>>,
    log: SharedStepLog,
    parameters: ToolParameters,
}

#[cfg(feature = "mcp")]
impl McpSequentialThinkingTool {
    pub const NAME: &'static str = "sequential_thinking";

    pub fn new(bridge: Arc<Bridge<MCPClient>>, log: SharedStepLog) -> Self {
        Self {
            bridge,
            log,
            parameters: ToolParameters::object()
                .string("thought", "Your current thinking step", true)
                .positive_integer_or("thought_number", "Number of this thought", 1)
                .positive_integer_or("total_thoughts", "Estimated total thoughts", DEFAULT_TOTAL_STEPS)
                .boolean("next_thought_needed", "Whether another thought follows", true)
                .boolean("is_revision", "Whether this revises an earlier thought", false)
                .positive_integer("revises_thought", "Thought being revised", false)
                .positive_integer("branch_from_thought", "Thought this branches from", false)
                .string("branch_id", "Branch identifier", false)
                .boolean("needs_more_thoughts", "Whether more thoughts than planned are needed", false)
                .build(),
        }
    }

    fn record(&self, request: &ThoughtRequest) {
        let mut metadata = BTreeMap::new();
        if let Some(revises) = request.revises_thought.filter(|_| request.is_revision) {
            metadata.insert("revises".to_string(), serde_json::Value::from(revises));
        }
        if let Some(branch_id) = &request.branch_id {
            metadata.insert("branch".to_string(), serde_json::Value::from(branch_id.as_str()));
        }
        lock(&self.log).add_step(
            request.thought.as_str(),
            request.thought_number,
            request.total_thoughts,
            Some(metadata),
        );
    }
}

#[cfg(feature = "mcp")]
impl Tool for McpSequentialThinkingTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Dynamic, reflective problem solving through numbered thoughts that can be \
         revised or branched. Backed by the sequential-thinking MCP server."
    }

    fn parameters(&self) -> &ToolParameters {
        &self.parameters
    }

    fn execute(&self, args: &ToolArguments) -> Result<String> {
        let request = thought_request(args)?;

        self.bridge.start()?;
        let reply = self.bridge.sequential_thinking(request.clone())?;
        self.record(&request);

        Ok(format!(
            "✓ Thought {}/{} recorded\n{reply}",
            request.thought_number, request.total_thoughts
        ))
    }
}

#[cfg(feature = "mcp")]
fn thought_request(args: &ToolArguments) -> Result<ThoughtRequest> {
    let thought = args.get_str("thought")?;
    if thought.trim().is_empty() {
        return Err(BridgeError::InvalidArgument("thought must not be empty".into()));
    }

    Ok(ThoughtRequest {
        thought: thought.to_string(),
        thought_number: args.get_u32_or("thought_number", 1)?,
        total_thoughts: args.get_u32_or("total_thoughts", DEFAULT_TOTAL_STEPS)?,
        next_thought_needed: args.get_bool_or("next_thought_needed", true)?,
        is_revision: args.get_bool_or("is_revision", false)?,
        revises_thought: args.get_u32_opt("revises_thought")?,
        branch_from_thought: args.get_u32_opt("branch_from_thought")?,
        branch_id: args.get_str_opt("branch_id").map(str::to_string),
        needs_more_thoughts: args.get_bool_or("needs_more_thoughts", false)?,
    })
}

/// The thinking tool set selected by configuration.
///
/// Empty when thinking is disabled. With `use_real_mcp` the step recorder is
/// replaced by the MCP-backed tool; summary and clear are always included.
pub fn thinking_tools(config: &AppConfig, log: SharedStepLog) -> Vec<Box<dyn Tool>> {
    if !config.enable_mcp_thinking {
        return Vec::new();
    }

    let mut tools: Vec<Box<dyn Tool>> = Vec::with_capacity(3);
    tools.push(primary_tool(config, SharedStepLog::clone(&log)));
    tools.push(Box::new(ThinkingSummaryTool::new(SharedStepLog::clone(&log))));
    tools.push(Box::new(ClearThinkingTool::new(log)));
    tools
}

#[cfg(feature = "mcp")]
fn primary_tool(config: &AppConfig, log: SharedStepLog) -> Box<dyn Tool> {
    if config.use_real_mcp {
        let bridge = Arc::new(Bridge::from_config(config));
        Box::new(McpSequentialThinkingTool::new(bridge, log))
    } else {
        Box::new(ThinkStepTool::new(log))
    }
}

#[cfg(not(feature = "mcp"))]
fn primary_tool(config: &AppConfig, log: SharedStepLog) -> Box<dyn Tool> {
    if config.use_real_mcp {
        tracing::warn!("built without the mcp feature; using the local step recorder");
    }
    Box::new(ThinkStepTool::new(log))
}
