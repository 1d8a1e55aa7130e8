// Colored terminal output for run and load summaries.

use colored::Colorize;

use crate::loader::LoadSummary;
use crate::pipeline::vonmon::RunSummary;

/// Display the outcome of a model run.
pub fn display_run_summary(summary: &RunSummary) {
    println!("\n{}", "Model run complete.".bold());
    println!("  Records read:     {}", summary.records);
    println!(
        "  Documents kept:   {} ({} dropped with singleton authors)",
        summary.documents,
        summary.records.saturating_sub(summary.documents)
    );
    println!("  Authors:          {}", summary.authors);
    println!("  Vocabulary terms: {}", summary.terms);
    println!("  Topics:           {}", summary.topics);
    println!(
        "\nArtifacts written to {}",
        summary.output_dir.display().to_string().bold()
    );
}

/// Display the outcome of a results load.
pub fn display_load_summary(summary: &LoadSummary) {
    println!("\n{}", "Load complete.".bold());
    println!("  Dashboard: {}", summary.dashboard_slug.bold());
    println!("  Topics:    {}", summary.topics);
    println!("  Emphases:  {}", summary.emphases);
    if summary.unmatched > 0 {
        println!(
            "  {} {} emphasis rows have no legislator match",
            "~".yellow(),
            summary.unmatched
        );
    }
}
