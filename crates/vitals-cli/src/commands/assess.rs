//! Assessment command implementations

use std::path::Path;

use anyhow::Result;
use vitals_core::ai::{AIBackend, AIClient};
use vitals_core::models::{Assessment, Severity};
use vitals_core::pipeline::AssessmentPipeline;

use super::{ai_client, load_history};

/// Run the full pipeline on a history file and print the result
pub async fn cmd_assess(file: &Path, json: bool) -> Result<()> {
    let client = ai_client()?;
    let pipeline = AssessmentPipeline::new(client)?;

    let output = assess(&pipeline, file, json).await?;
    println!("{}", output);

    Ok(())
}

/// Print the rendered explanation prompt for a history file
pub fn cmd_prompt(file: &Path) -> Result<()> {
    // Rendering never calls the backend
    let pipeline = AssessmentPipeline::new(AIClient::mock())?;

    println!("{}", render_prompt(&pipeline, file)?);

    Ok(())
}

/// Assess a history file, returning either JSON or the human summary
pub async fn assess<B: AIBackend>(
    pipeline: &AssessmentPipeline<B>,
    file: &Path,
    json: bool,
) -> Result<String> {
    let history = load_history(file)?;
    let assessment = pipeline.run(&history).await?;

    if json {
        Ok(serde_json::to_string_pretty(&assessment)?)
    } else {
        Ok(format_assessment(&assessment))
    }
}

/// Render the explanation prompt for a history file
pub fn render_prompt<B: AIBackend>(pipeline: &AssessmentPipeline<B>, file: &Path) -> Result<String> {
    let history = load_history(file)?;
    let analysis = pipeline.analyze(&history)?;
    Ok(pipeline.render_prompt(&analysis.debug_view()))
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "🔴",
        Severity::Medium => "🟡",
        Severity::Low => "🟢",
    }
}

/// Human-readable assessment
pub fn format_assessment(assessment: &Assessment) -> String {
    let summary = &assessment.summary;
    let features = &assessment.debug.features;

    let mut lines = vec![
        format!("📊 Assessment for {}", features.month),
        String::new(),
        format!(
            "   {} {} (severity: {}, confidence: {:.2})",
            severity_icon(summary.severity),
            summary.headline,
            summary.severity,
            summary.confidence
        ),
        format!("   Action: {}", summary.action),
        format!("   Note:   {}", summary.note),
        String::new(),
        format!(
            "   Income {:.2}, expenses {:.2}, savings {:.2} (ratio {:.2})",
            features.income, features.total_expenses, features.savings, features.expense_ratio
        ),
        format!(
            "   Largest category: {} ({:.0}%)",
            features.dominant_category,
            features.dominant_share * 100.0
        ),
    ];

    if !features.risk_flags.is_empty() {
        let flags: Vec<&str> = features.risk_flags.iter().map(|f| f.as_str()).collect();
        lines.push(format!("   Risk flags: {}", flags.join(", ")));
    }

    lines.push(format!("   Trend: {}", summary.trend));

    let anomalies = assessment.debug.anomalies();
    if !anomalies.is_empty() {
        let tags: Vec<String> = anomalies.iter().map(|a| a.tag()).collect();
        lines.push(format!("   Anomalies: {}", tags.join(", ")));
    }

    if !summary.explanation.is_empty() {
        lines.push(String::new());
        lines.push(format!("   {}", summary.explanation));
    }

    lines.join("\n")
}
