//! Replay scripts: one command per line, `#` comments, `tick N` directives.

use anyhow::{Context, Result, bail};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Command(String),
    Tick(u32),
}

/// Parse a script body. Blank lines and comments are skipped.
pub fn parse(body: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (index, raw) in body.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        if let Some(step) = parse_directive(line).with_context(|| format!("line {}", index + 1))? {
            steps.push(step);
        } else {
            steps.push(Step::Command(line.to_string()));
        }
    }
    Ok(steps)
}

/// `tick` and `tick N` are directives; everything else goes to the engine.
pub fn parse_directive(line: &str) -> Result<Option<Step>> {
    let mut parts = line.split_whitespace();
    if !parts.next().is_some_and(|head| head.eq_ignore_ascii_case("tick")) {
        return Ok(None);
    }
    let count = match parts.next() {
        None => 1,
        Some(n) => n
            .parse::<u32>()
            .with_context(|| format!("invalid tick count `{n}`"))?,
    };
    if parts.next().is_some() {
        bail!("tick takes a single count");
    }
    Ok(Some(Step::Tick(count)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_ticks_and_comments() {
        let body = "# opening\nscavenge\n\ntick 30  # wait\nTICK\nbuild water purifier\n";
        let steps = parse(body).expect("parse");
        assert_eq!(
            steps,
            vec![
                Step::Command("scavenge".into()),
                Step::Tick(30),
                Step::Tick(1),
                Step::Command("build water purifier".into()),
            ]
        );
    }

    #[test]
    fn rejects_bad_tick_counts() {
        let err = parse("tick many").expect_err("bad count");
        assert!(format!("{err:#}").contains("line 1"));
        assert!(parse("tick 1 2").is_err());
    }

    #[test]
    fn ticker_is_not_a_directive() {
        assert_eq!(parse_directive("ticker").expect("ok"), None);
    }
}
