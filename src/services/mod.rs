pub mod candidates;
pub mod interactions;
pub mod popularity;
pub mod profile;
pub mod recommendations;
pub mod scoring;

pub use candidates::CandidateSelector;
pub use interactions::InteractionService;
pub use popularity::{calculate_popularity, InteractionCounts, PopularityService};
pub use profile::build_tag_profile;
pub use recommendations::RecommendationService;
pub use scoring::score_content;

use crate::models::InteractionKind;

/// Relative weight of each interaction kind when scoring engagement.
///
/// The match is exhaustive, so adding an interaction kind forces a weight
/// decision here before the crate compiles again.
pub(crate) fn interaction_weight(kind: InteractionKind) -> f64 {
    match kind {
        InteractionKind::Like => 1.0,
        InteractionKind::Comment => 3.0,
        InteractionKind::Share => 5.0,
        InteractionKind::Rate => 2.0,
    }
}
