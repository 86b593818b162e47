use crate::domain::Preset;
use crate::error::Result;

/// Decides which commit convention a batch of messages follows
pub trait ConventionDetector: Send + Sync {
    /// Returns `None` when no known convention fits the messages
    fn detect(&self, messages: &[String]) -> Result<Option<Preset>>;
}

/// Detects a preset by counting how many commit headers each preset accepts.
///
/// The preset with the most matching headers wins; ties go to the earlier
/// entry of [`Preset::ALL`], so the narrow layouts beat the catch-all
/// `jquery` one.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderDetector;

impl ConventionDetector for HeaderDetector {
    fn detect(&self, messages: &[String]) -> Result<Option<Preset>> {
        let mut best: Option<(Preset, usize)> = None;

        for preset in Preset::ALL {
            let hits = messages.iter().filter(|m| preset.matches(m)).count();
            if hits == 0 {
                continue;
            }
            if best.map_or(true, |(_, top)| hits > top) {
                best = Some((preset, hits));
            }
        }

        Ok(best.map(|(preset, _)| preset))
    }
}
