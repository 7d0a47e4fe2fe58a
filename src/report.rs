use std::fmt::Display;

use itertools::Itertools;

use crate::resolver::Resolution;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

// Renders a successful resolution the way dig lays out its answer. Every
// line is labelled with the domain the user asked for, even when the answer
// was found under an alias.
pub fn render_answer(original_domain: &str, resolution: &Resolution) -> String {
    let questions = resolution
        .response
        .questions()
        .iter()
        .map(|question| relabel(original_domain, question))
        .join("\n");
    let answers = resolution
        .answers()
        .iter()
        .map(|answer| relabel(original_domain, answer))
        .join("\n");

    format!(
        "QUESTION SECTION:\n{}\n\nANSWER SECTION:\n{}\n\nQuery time: {} msec\nWHEN: {}",
        questions,
        answers,
        resolution.elapsed.as_millis(),
        resolution.timestamp.format(TIMESTAMP_FORMAT)
    )
}

// Replaces the owner name, the first word of a record line, with name.
fn relabel(name: &str, line: &impl Display) -> String {
    let text = line.to_string();
    match text.split_once(' ') {
        Some((_, rest)) => format!("{} {}", name, rest),
        None => text,
    }
}
