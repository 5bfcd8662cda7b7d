//! Retrieval planning.
//!
//! Pure function from (complexity label, optional content signal, tuning)
//! to a plan. The content bias is a soft ranking boost handed to the
//! storage collaborator — never a filter, so a wrong bias cannot cause a
//! zero-result outcome.

use serde::Serialize;

use sift_core::label::ContentLabel;
use sift_core::tuning::Tuning;

use crate::complexity::QueryProfile;

#[derive(Debug, Clone, Serialize)]
pub struct RetrievalPlan {
    pub result_count: usize,
    pub bias: Option<ContentLabel>,
}

pub fn plan(profile: &QueryProfile, content_signal: Option<ContentLabel>, tuning: &Tuning) -> RetrievalPlan {
    RetrievalPlan {
        result_count: tuning.retrieval.for_label(profile.label),
        // A generic signal carries no information worth biasing on.
        bias: content_signal.filter(|l| *l != ContentLabel::Generic),
    }
}
