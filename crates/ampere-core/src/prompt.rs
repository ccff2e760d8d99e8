//! Shared prompt rendering for structured-output agents.
//!
//! Every agent prompt has the same skeleton: a persona sentence, one or more
//! labelled data sections, an optional context block, a numbered task list,
//! a literal example of the JSON the model must return, optional notes, and a
//! closing instruction to return only JSON. Agents supply the content; this
//! module owns the layout.

use serde_json::Value;

/// Closing line appended to every prompt.
pub const JSON_ONLY_INSTRUCTION: &str =
    "Return ONLY valid JSON, with no explanations or text outside the JSON object.";

/// Builder for an agent prompt. Rendering is pure and deterministic.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    persona: String,
    sections: Vec<(String, String)>,
    context: Option<String>,
    tasks: Vec<String>,
    example: Value,
    notes: Vec<String>,
}

impl PromptTemplate {
    /// Start a prompt with its persona sentence and the example output.
    ///
    /// The example's keys are the keys the agent's schema names, so the
    /// model can copy the shape.
    pub fn new(persona: impl Into<String>, example: Value) -> Self {
        Self {
            persona: persona.into(),
            sections: Vec::new(),
            context: None,
            tasks: Vec::new(),
            example,
            notes: Vec::new(),
        }
    }

    /// Add a labelled block of input data.
    pub fn section(mut self, label: impl Into<String>, body: impl Into<String>) -> Self {
        self.sections.push((label.into(), body.into()));
        self
    }

    /// Add a labelled JSON value, pretty-printed with two-space indentation.
    pub fn json_section(self, label: impl Into<String>, value: &Value) -> Self {
        let body = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        self.section(label, body)
    }

    /// Attach an optional free-form context block. `None` leaves no trace in
    /// the rendered prompt.
    pub fn context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }

    /// Append a task. Multi-line tasks keep their continuation lines indented
    /// under the number.
    pub fn task(mut self, task: impl Into<String>) -> Self {
        self.tasks.push(task.into());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Render the final instruction text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.persona);
        out.push_str("\n\n");

        for (label, body) in &self.sections {
            out.push_str(label);
            out.push_str(":\n");
            out.push_str(body.trim_end());
            out.push_str("\n\n");
        }

        if let Some(context) = &self.context {
            out.push_str(context.trim());
            out.push_str("\n\n");
        }

        if !self.tasks.is_empty() {
            out.push_str("Task:\n");
            for (i, task) in self.tasks.iter().enumerate() {
                let mut lines = task.lines();
                if let Some(first) = lines.next() {
                    out.push_str(&format!("{}. {}\n", i + 1, first));
                }
                for line in lines {
                    out.push_str("   ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
            out.push('\n');
        }

        out.push_str("Output JSON Format:\n");
        let example = serde_json::to_string_pretty(&self.example)
            .unwrap_or_else(|_| self.example.to_string());
        out.push_str(&example);
        out.push_str("\n\n");

        if !self.notes.is_empty() {
            out.push_str("Notes:\n");
            for note in &self.notes {
                out.push_str("- ");
                out.push_str(note);
                out.push('\n');
            }
            out.push('\n');
        }

        out.push_str(JSON_ONLY_INSTRUCTION);
        out
    }
}

/// Keep at most `budget` characters of `text`.
///
/// Counts Unicode scalar values, never splitting a character.
pub fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
