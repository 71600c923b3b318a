//! Batch orchestration
//!
//! Runs the item converter over every uploaded item of one request, one after
//! another, and collects the successes in input order. Callers are expected to
//! hold an admission slot for the whole run.

use pixpress_core::{BatchResult, ConversionOptions, SkippedItem, UploadedItem};

use crate::converter::ItemConverter;

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// Every item was skipped, or there were no items at all.
    #[error("no valid items in batch ({submitted} submitted)")]
    NoValidItems {
        submitted: usize,
        skipped: Vec<SkippedItem>,
    },
}

pub struct BatchOrchestrator {
    converter: ItemConverter,
}

impl BatchOrchestrator {
    pub fn new(converter: ItemConverter) -> Self {
        Self { converter }
    }

    /// Media type of every converted item.
    pub fn output_mime_type(&self) -> &'static str {
        self.converter.codec().mime_type()
    }

    /// Convert all `items` sequentially.
    ///
    /// Items are consumed as they are processed so each source buffer is
    /// released once its output exists. Skipped items are logged and
    /// recorded; they never abort the batch.
    pub fn run(
        &self,
        items: Vec<UploadedItem>,
        options: &ConversionOptions,
    ) -> Result<BatchResult, BatchError> {
        let submitted = items.len();
        let mut result = BatchResult::default();

        for (index, item) in items.into_iter().enumerate() {
            match self.converter.convert(&item, options) {
                Ok(converted) => {
                    tracing::debug!(
                        index,
                        item = %item.name,
                        input_bytes = item.size(),
                        output_bytes = converted.data.len(),
                        "Converted item"
                    );
                    result.items.push(converted);
                }
                Err(reason) => {
                    tracing::warn!(
                        index,
                        item = %item.name,
                        reason = reason.kind(),
                        error = %reason,
                        "Skipping item"
                    );
                    result.skipped.push(SkippedItem {
                        name: item.name,
                        reason: reason.to_string(),
                    });
                }
            }
        }

        if result.is_empty() {
            return Err(BatchError::NoValidItems {
                submitted,
                skipped: result.skipped,
            });
        }

        tracing::info!(
            submitted,
            converted = result.converted_count(),
            skipped = result.skipped_count(),
            "Batch finished"
        );

        Ok(result)
    }
}
