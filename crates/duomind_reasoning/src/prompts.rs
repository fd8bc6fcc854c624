//! Prompt templates for the two roles.
//!
//! Both prompts end with a `Task:` line so backends (and the mock) can find
//! the task without parsing the rest.

fn context_block(context: Option<&str>) -> String {
    match context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(c) => format!("\n== CONTEXT ==\n{}\n", c),
        None => String::new(),
    }
}

/// Logical role: an ordered, checkable plan.
pub fn architect_prompt(task: &str, context: Option<&str>) -> String {
    format!(
        "You are the ARCHITECT: a careful, logical planner.\n\
         Break the task into a short numbered plan. Each step must be concrete and checkable.\n\
         State assumptions explicitly and end with the single most important next action.\n\
         Do not speculate beyond what the task supports.\n{}\nTask: {}\n",
        context_block(context),
        task.trim()
    )
}

/// Creative role: reframe the problem and offer an unexpected angle.
pub fn oracle_prompt(task: &str, context: Option<&str>) -> String {
    format!(
        "You are the ORACLE: an intuitive, creative thinker.\n\
         Reframe the task from an unusual perspective and suggest one or two surprising approaches.\n\
         Prefer vivid ideas over exhaustive lists, and say what the obvious plan would miss.\n{}\nTask: {}\n",
        context_block(context),
        task.trim()
    )
}
