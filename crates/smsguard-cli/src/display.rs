//! Terminal rendering for predictions, stored messages, and corpus summaries.

use smsguard_core::{CorpusSummary, MessageStats, PredictionResult, Scale, StoredMessage};

/// One line per prediction, e.g. `Prediction: spam | Accuracy: 66.67%`.
pub fn format_prediction(result: &PredictionResult, scale: Scale) -> String {
    if result.is_unknown() {
        return "Could not determine (tie)".to_string();
    }
    let suffix = match scale {
        Scale::Percent => "%",
        Scale::Ratio => "",
    };
    format!(
        "Prediction: {} | Accuracy: {:.2}{suffix}",
        result.prediction, result.confidence
    )
}

pub fn print_prediction(result: &PredictionResult, scale: Scale) {
    println!("{}", format_prediction(result, scale));
}

pub fn print_stats(stats: &MessageStats) {
    println!("Total messages: {}", stats.total_messages);
    println!("  scam: {}", stats.scam_messages);
    println!("  ham:  {}", stats.ham_messages);
}

pub fn format_message_row(msg: &StoredMessage) -> String {
    format!(
        "{:>6}  {:<5}  {}  {}",
        msg.id,
        msg.label,
        msg.created_at.format("%Y-%m-%d %H:%M"),
        msg.preview()
    )
}

pub fn print_messages(messages: &[StoredMessage]) {
    if messages.is_empty() {
        println!("No stored messages.");
        return;
    }
    println!("{:>6}  {:<5}  {:<16}  MESSAGE", "ID", "LABEL", "CREATED");
    for msg in messages {
        println!("{}", format_message_row(msg));
    }
}

pub fn print_corpora(corpora: &[CorpusSummary]) {
    for c in corpora {
        println!(
            "{}: {}/{} labels, {:?} mode, {:?} scale, {} records ({} skipped), {} spam words, {} ham words",
            c.name,
            c.spam_label,
            c.ham_label,
            c.mode,
            c.scale,
            c.records_indexed,
            c.records_skipped,
            c.spam_words,
            c.ham_words,
        );
    }
}
