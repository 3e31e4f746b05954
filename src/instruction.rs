//! Versioned system instruction prepended to every question.
//!
//! The instruction is the assistant's behavior policy: tone, the answer
//! template and the escalation path for high-risk topics. It lives in
//! `prompts/system_instruction.yaml` and is audited before the gateway
//! accepts traffic.

use crate::constants::USER_QUESTION_PREFIX;
use crate::errors::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Instruction shipped with the binary.
const EMBEDDED_INSTRUCTION: &str = include_str!("../prompts/system_instruction.yaml");

/// Behavior policy for the upstream model.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SystemInstruction {
    /// Version label, bumped with every change to `text`
    pub version: String,
    /// Exact notice the model must give for questions it should not answer
    pub escalation_notice: String,
    /// High-risk topics that must be escalated rather than answered
    pub escalation_topics: Vec<String>,
    /// Headings of the answer template
    pub required_sections: Vec<String>,
    /// Full instruction text sent upstream
    pub text: String,
}

impl SystemInstruction {
    /// Loads the instruction compiled into the binary.
    pub fn embedded() -> Result<Self, Error> {
        Self::from_yaml(EMBEDDED_INSTRUCTION)
    }

    /// Loads an instruction from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let instruction = Self::from_yaml(&yaml)?;
        info!(
            "Loaded system instruction {} from {}",
            instruction.version,
            path.display()
        );
        Ok(instruction)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Combines the instruction with a user question into one prompt.
    ///
    /// The question is appended as given, without trimming.
    pub fn build_prompt(&self, query: &str) -> String {
        let mut prompt =
            String::with_capacity(self.text.len() + USER_QUESTION_PREFIX.len() + query.len());
        prompt.push_str(&self.text);
        prompt.push_str(USER_QUESTION_PREFIX);
        prompt.push_str(query);
        prompt
    }

    /// Lists every way the text fails to carry its own policy.
    ///
    /// An empty result means the escalation notice, every escalation topic
    /// and every template section appear in the text.
    pub fn audit(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let haystack = self.text.to_lowercase();

        if self.version.trim().is_empty() {
            problems.push("version is empty".to_string());
        }
        if self.text.trim().is_empty() {
            problems.push("text is empty".to_string());
        }
        if self.escalation_topics.is_empty() {
            problems.push("no escalation topics listed".to_string());
        }

        // Notice lines may be indented inside the text.
        let notice_lines: Vec<&str> = self
            .escalation_notice
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if notice_lines.is_empty() {
            problems.push("escalation notice is empty".to_string());
        }
        for line in notice_lines {
            if !self.text.contains(line) {
                problems.push(format!("escalation notice line missing: {line}"));
            }
        }

        for topic in &self.escalation_topics {
            if !haystack.contains(&topic.to_lowercase()) {
                problems.push(format!("escalation topic missing: {topic}"));
            }
        }
        for section in &self.required_sections {
            if !self.text.contains(section.as_str()) {
                problems.push(format!("template section missing: {section}"));
            }
        }

        problems
    }

    /// Fails with [`Error::InstructionAudit`] unless [`audit`](Self::audit) is clean.
    pub fn ensure_audited(self) -> Result<Self, Error> {
        let problems = self.audit();
        if problems.is_empty() {
            Ok(self)
        } else {
            Err(Error::InstructionAudit {
                version: self.version,
                problems,
            })
        }
    }
}
