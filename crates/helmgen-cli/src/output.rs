use helmgen_core::scaffold::Report;
use helmgen_core::types::Answer;
use serde::Serialize;
use std::collections::BTreeMap;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Stored answers as aligned `name  value` lines. Empty strings show as
/// `(empty)` so they are distinguishable from missing answers.
pub fn format_answers(answers: &BTreeMap<String, Answer>) -> String {
    let width = answers.keys().map(String::len).max().unwrap_or(0);
    let mut out = String::new();
    for (name, value) in answers {
        let shown = match value {
            Answer::Text(s) if s.is_empty() => "(empty)".to_string(),
            Answer::List(items) if items.is_empty() => "(none)".to_string(),
            other => other.to_string(),
        };
        out.push_str(&format!("{name:<width$}  {shown}\n"));
    }
    out
}

/// Print what a generator run touched, one file per line, then its notes.
pub fn print_report(report: &Report) {
    for change in &report.files {
        let label = format!("{}:", change.status);
        println!("  {label:<12} {}", change.path);
    }
    for note in &report.notes {
        println!();
        println!("{note}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_are_aligned() {
        let mut answers = BTreeMap::new();
        answers.insert("author_name".to_string(), Answer::from("Ada"));
        answers.insert("project_icon".to_string(), Answer::from(""));
        answers.insert(
            "project_keywords".to_string(),
            Answer::List(vec!["shop".into(), "retail".into()]),
        );
        assert_eq!(
            format_answers(&answers),
            "author_name       Ada\n\
             project_icon      (empty)\n\
             project_keywords  shop, retail\n"
        );
    }
}
