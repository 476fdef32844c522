//! Fact-extraction stage: one completion per search record.

use tracing::{debug, info, warn};

use crate::pipeline::progress::Progress;
use crate::pipeline::prompts::{format_results, render_prompt, Template};
use crate::traits::model::CompletionModel;
use crate::types::records::{ExtractionRecord, SearchRecord, StageOutput, Warning};

/// Ask the model for each record's fact, in order.
///
/// A failed completion records the `"Error"` sentinel for that entity and
/// the loop continues; this function itself never fails.
pub async fn run_extraction(
    records: &[SearchRecord],
    template: &Template,
    model: &dyn CompletionModel,
    progress: &dyn Progress,
) -> StageOutput<ExtractionRecord> {
    let total = records.len();
    let mut output = StageOutput {
        records: Vec::with_capacity(total),
        warnings: Vec::new(),
    };

    info!(records = total, "Starting extraction stage");

    for (i, record) in records.iter().enumerate() {
        let results_text = format_results(&record.results);
        let prompt = render_prompt(template, &record.entity, &results_text);
        debug!(entity = %record.entity, prompt_len = prompt.len(), "Requesting completion");

        let extracted = match model.complete(&prompt).await {
            Ok(text) => ExtractionRecord::new(record.entity.as_str(), text),
            Err(e) => {
                let warning = Warning::completion_failed(record.entity.as_str(), &e);
                warn!(entity = %record.entity, error = %e, "Completion failed");
                progress.warn(&warning);
                output.warnings.push(warning);
                ExtractionRecord::failed(record.entity.as_str())
            }
        };

        output.records.push(extracted);
        progress.advance(i + 1, total);
    }

    info!(
        records = output.records.len(),
        failed = output.warnings.len(),
        "Extraction completed"
    );
    output
}
