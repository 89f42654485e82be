use relatos_core::timefmt::format_timestamp;
use relatos_core::{youtube_url, Category, Narrator, SegmentationResult};
use relatos_review::{
    suggest_summary, suggest_title, validate_score, ClassificationDraft, ReviewCommand,
    ReviewSession, ReviewSink, ReviewSummary,
};
use relatos_store::PipelineStatus;
use std::io::{BufRead, Write};
use std::path::Path;

use crate::workspace;

const PREVIEW_CHARS: usize = 800;

/// `relatos review <id>`
pub fn execute(repo_root: &Path, id: &str) -> anyhow::Result<()> {
    let paths = workspace::paths(repo_root);
    let result = paths.results().load(id)?.ok_or_else(|| {
        anyhow::anyhow!("no segmentation for '{id}'. Run `relatos segment {id}` first.")
    })?;

    let mut sink = paths.review_sink();
    let stdin = std::io::stdin();
    let summary = review(result, &mut sink, &mut stdin.lock(), &mut std::io::stdout())?;

    PipelineStatus::update(&paths.status_json, &paths.lock_file, |status| {
        status.record_review(id, summary.verified, summary.total)
    })?;

    println!(
        "\nConfirmed {}, discarded {}, skipped {}. {} of {} spans reviewed, {} pending.",
        summary.confirmed,
        summary.discarded,
        summary.skipped,
        summary.verified,
        summary.total,
        summary.pending()
    );
    if sink.gold_added() > 0 {
        println!("{} new entries in the gold dataset.", sink.gold_added());
    }
    Ok(())
}

/// Drive a review session from line-based input until every pending span
/// has been handled, the reviewer quits, or input ends.
pub(crate) fn review<R: BufRead, W: Write>(
    result: SegmentationResult,
    sink: &mut dyn ReviewSink,
    input: &mut R,
    out: &mut W,
) -> anyhow::Result<ReviewSummary> {
    let transcript_id = result.transcript_id.clone();
    let mut session = ReviewSession::new(result, sink);

    while let Some((span, _)) = session.current() {
        let text = span.text.clone();
        if let Some((pos, total)) = session.position() {
            writeln!(out, "\n{}", "=".repeat(70))?;
            writeln!(
                out,
                "[{}/{total}] {} - {} ({:.0}s, pattern: {})",
                pos + 1,
                format_timestamp(span.start),
                format_timestamp(span.end),
                span.duration,
                span.matched_pattern
            )?;
            writeln!(out, "{}", youtube_url(&transcript_id, span.start))?;
            writeln!(out, "{}", "-".repeat(70))?;
            let preview: String = text.chars().take(PREVIEW_CHARS).collect();
            writeln!(out, "{preview}")?;
            if text.chars().count() > PREVIEW_CHARS {
                writeln!(out, "...")?;
            }
        }

        let command = loop {
            let Some(choice) = ask(input, out, "\n[s] story  [n] not a story  [k] skip  [q] quit > ")?
            else {
                break ReviewCommand::Quit;
            };
            match choice.to_lowercase().as_str() {
                "s" => break ReviewCommand::Classify,
                "n" => break ReviewCommand::Discard,
                "k" => break ReviewCommand::Skip,
                "q" => break ReviewCommand::Quit,
                _ => writeln!(out, "Enter s, n, k or q.")?,
            }
        };

        if command == ReviewCommand::Classify {
            session.apply(ReviewCommand::Classify)?;
            match ask_draft(input, out, &text)? {
                Some(draft) => session.apply(ReviewCommand::Confirm(draft))?,
                None => session.apply(ReviewCommand::Cancel)?,
            };
        } else {
            session.apply(command)?;
        }
    }

    let (_, summary) = session.finish();
    Ok(summary)
}

/// Prompt for a classification. `None` when the reviewer cancels or input ends.
fn ask_draft<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    span_text: &str,
) -> anyhow::Result<Option<ClassificationDraft>> {
    writeln!(out, "\nCategory:")?;
    for c in Category::ALL {
        writeln!(out, "  [{}] {c}", c.menu_key())?;
    }
    let category = loop {
        let Some(answer) = ask(input, out, "category (c to cancel) > ")? else {
            return Ok(None);
        };
        if answer.eq_ignore_ascii_case("c") {
            return Ok(None);
        }
        match Category::from_menu_key(&answer).or_else(|| Category::parse(&answer)) {
            Some(c) => break c,
            None => writeln!(out, "Unknown category.")?,
        }
    };

    let subs = category.subcategories();
    writeln!(out, "\nSubcategory of {category}:")?;
    for (i, sub) in subs.iter().enumerate() {
        writeln!(out, "  [{}] {sub}", i + 1)?;
    }
    let subcategory = loop {
        let Some(answer) = ask(input, out, "subcategory (enter = general) > ")? else {
            return Ok(None);
        };
        if answer.is_empty() {
            break None;
        }
        let picked = answer
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| subs.get(i).copied())
            .or_else(|| category.has_subcategory(&answer).then_some(answer.as_str()));
        match picked {
            Some(sub) => break Some(sub.to_string()),
            None => writeln!(out, "Not a subcategory of {category}.")?,
        }
    };

    writeln!(out, "\nNarrator:")?;
    for n in Narrator::ALL {
        writeln!(out, "  [{}] {n}", n.menu_key())?;
    }
    let narrator = loop {
        let Some(answer) = ask(input, out, "narrator (enter = oyente) > ")? else {
            return Ok(None);
        };
        if answer.is_empty() {
            break Narrator::Listener;
        }
        match Narrator::from_menu_key(&answer) {
            Some(n) => break n,
            None => writeln!(out, "Enter 1, 2 or 3.")?,
        }
    };

    let wtf_score = loop {
        let Some(answer) = ask(input, out, "wtf score 0.0-1.0 > ")? else {
            return Ok(None);
        };
        match answer.parse::<f64>().map(validate_score) {
            Ok(Ok(score)) => break score,
            Ok(Err(e)) => writeln!(out, "{e}")?,
            Err(_) => writeln!(out, "Enter a number such as 0.7.")?,
        }
    };

    writeln!(out, "\nSuggested title: {}", suggest_title(span_text))?;
    let Some(title) = ask(input, out, "title (enter = suggested) > ")? else {
        return Ok(None);
    };
    writeln!(out, "Suggested summary: {}", suggest_summary(span_text))?;
    let Some(summary) = ask(input, out, "summary (enter = suggested) > ")? else {
        return Ok(None);
    };

    Ok(Some(ClassificationDraft {
        category,
        subcategory,
        narrator,
        wtf_score,
        title: Some(title),
        summary: Some(summary),
    }))
}

/// Print `prompt` and read one trimmed line. `None` at end of input.
fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> anyhow::Result<Option<String>> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
