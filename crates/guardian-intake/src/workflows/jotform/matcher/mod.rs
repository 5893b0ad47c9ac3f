//! Offline matching of vendor form labels to the semantic field vocabulary.
//!
//! The output is reviewed by an operator and saved as the mapping file the encoder reads at
//! startup; nothing here runs on the request path.

mod dictionary;
mod normalizer;

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::mapping::{FieldMapping, MappedField, SemanticField};
use super::schema::{FieldType, FormFieldDescriptor};
use dictionary::{exact_match, reference_facet, ReferenceFacet, LABEL_DICTIONARY};
use normalizer::normalize_label;

const CONTAINMENT_WEIGHT: f64 = 80.0;
const REFERENCE_FACET_SCORE: f64 = 90.0;
const REFERENCE_TWO_FOLLOW_ON_SCORE: f64 = 95.0;
const AVAILABILITY_SCORE: f64 = 85.0;
const ATTESTATION_SCORE: f64 = 90.0;

/// Result of one matching run.
#[derive(Debug, Clone, Default)]
pub struct MatchReport {
    pub mapping: FieldMapping,
    /// Answerable descriptors that claimed nothing, in form order, for manual mapping.
    pub unmatched: Vec<FormFieldDescriptor>,
    pub layout_skipped: usize,
}

/// How a descriptor came to hold a semantic field.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ClaimStrength {
    /// Exact dictionary hit, section rule, or file-upload rule.
    Firm,
    /// Fuzzy score; a later descriptor with a strictly higher score takes the field over.
    Scored(f64),
}

#[derive(Debug, Clone, Copy)]
struct Claim {
    descriptor: usize,
    strength: ClaimStrength,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    field: SemanticField,
    score: f64,
}

#[derive(Debug, Default)]
struct MatchState {
    claims: BTreeMap<SemanticField, Claim>,
    in_reference_two_section: bool,
}

impl MatchState {
    fn is_claimed(&self, field: SemanticField) -> bool {
        self.claims.contains_key(&field)
    }

    /// Whether a fuzzy candidate scoring `score` may take `field`.
    fn can_take(&self, field: SemanticField, score: f64) -> bool {
        match self.claims.get(&field) {
            None => true,
            Some(Claim {
                strength: ClaimStrength::Scored(held),
                ..
            }) => score > *held,
            Some(_) => false,
        }
    }

    fn is_firmly_claimed(&self, field: SemanticField) -> bool {
        matches!(
            self.claims.get(&field),
            Some(Claim {
                strength: ClaimStrength::Firm,
                ..
            })
        )
    }

    fn claim(&mut self, field: SemanticField, descriptor: usize, strength: ClaimStrength) {
        if let Some(previous) = self.claims.insert(field, Claim { descriptor, strength }) {
            debug!(
                %field,
                displaced = previous.descriptor,
                "higher-scoring label displaced an earlier fuzzy match"
            );
        }
    }
}

/// Matches vendor descriptors against the label dictionary.
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldMatcher;

impl FieldMatcher {
    pub fn new() -> Self {
        Self
    }

    pub fn match_fields(&self, descriptors: &[FormFieldDescriptor]) -> MatchReport {
        let mut ordered: Vec<&FormFieldDescriptor> = descriptors.iter().collect();
        ordered.sort_by_key(|descriptor| descriptor.numeric_id());

        let mut state = MatchState::default();
        let mut layout_skipped = 0;

        for (index, descriptor) in ordered.iter().enumerate() {
            if descriptor.field_type.is_layout() {
                layout_skipped += 1;
                continue;
            }

            if descriptor.is_unlabeled() {
                continue;
            }
            let label = normalize_label(&descriptor.label);
            if label.is_empty() {
                continue;
            }

            if label.contains("reference 2") || state.reference_two_pending() {
                state.in_reference_two_section = true;
            }

            match decide(&label, &descriptor.field_type, &state) {
                Some((field, strength)) => {
                    debug!(field_id = %descriptor.field_id, label = %descriptor.label, %field, "matched");
                    state.claim(field, index, strength);
                }
                None => {
                    debug!(field_id = %descriptor.field_id, label = %descriptor.label, "no match");
                }
            }
        }

        let claimed: Vec<usize> = state.claims.values().map(|claim| claim.descriptor).collect();
        let mut mapping = FieldMapping::new();
        for (field, claim) in &state.claims {
            mapping.claim(*field, MappedField::from_descriptor(ordered[claim.descriptor]));
        }

        let unmatched: Vec<FormFieldDescriptor> = ordered
            .iter()
            .enumerate()
            .filter(|(index, descriptor)| {
                !descriptor.field_type.is_layout() && !claimed.contains(index)
            })
            .map(|(_, descriptor)| (*descriptor).clone())
            .collect();

        info!(
            matched = mapping.len(),
            unmatched = unmatched.len(),
            layout_skipped,
            "field matching complete"
        );

        MatchReport {
            mapping,
            unmatched,
            layout_skipped,
        }
    }
}

impl MatchState {
    /// Reference 2's name is known but neither of its contact fields has been seen yet.
    fn reference_two_pending(&self) -> bool {
        self.is_claimed(SemanticField::Reference2Name)
            && !self.is_claimed(SemanticField::Reference2Email)
            && !self.is_claimed(SemanticField::Reference2Phone)
    }
}

fn decide(
    label: &str,
    field_type: &FieldType,
    state: &MatchState,
) -> Option<(SemanticField, ClaimStrength)> {
    if let Some(field) = reference_two_follow_on(label, state) {
        return Some((field, ClaimStrength::Firm));
    }

    if let Some(field) = exact_match(label) {
        if state.is_firmly_claimed(field) {
            return None;
        }
        return Some((field, ClaimStrength::Firm));
    }

    if *field_type == FieldType::FileUpload
        && ["resume", "cv", "file"].iter().any(|key| label.contains(key))
        && !state.is_claimed(SemanticField::Resume)
    {
        return Some((SemanticField::Resume, ClaimStrength::Firm));
    }

    best_candidate(label, field_type, state)
        .map(|candidate| (candidate.field, ClaimStrength::Scored(candidate.score)))
}

/// Forms often label reference 2's contact fields plainly "Email" / "Phone".
fn reference_two_follow_on(label: &str, state: &MatchState) -> Option<SemanticField> {
    if !state.in_reference_two_section || !state.is_claimed(SemanticField::Reference2Name) {
        return None;
    }

    if label == "email" && !state.is_claimed(SemanticField::Reference2Email) {
        return Some(SemanticField::Reference2Email);
    }

    if label.contains("phone") && !state.is_claimed(SemanticField::Reference2Phone) {
        return Some(SemanticField::Reference2Phone);
    }

    None
}

fn best_candidate(label: &str, field_type: &FieldType, state: &MatchState) -> Option<Candidate> {
    let mut candidates = Vec::new();

    if state.is_claimed(SemanticField::Reference2Name) {
        if label == "email" && !state.is_claimed(SemanticField::Reference2Email) {
            candidates.push(Candidate {
                field: SemanticField::Reference2Email,
                score: REFERENCE_TWO_FOLLOW_ON_SCORE,
            });
        }
        if label == "phone" && !state.is_claimed(SemanticField::Reference2Phone) {
            candidates.push(Candidate {
                field: SemanticField::Reference2Phone,
                score: REFERENCE_TWO_FOLLOW_ON_SCORE,
            });
        }
    }

    for (key, field) in LABEL_DICTIONARY {
        if label.contains(key) || key.contains(label) {
            candidates.push(Candidate {
                field: *field,
                score: containment_score(label, key),
            });
        }

        if let Some((reference, facet)) = reference_facet(*field) {
            if reference_facet_matches(label, reference, facet) {
                candidates.push(Candidate {
                    field: *field,
                    score: REFERENCE_FACET_SCORE,
                });
            }
        }
    }

    if label.contains("avail") {
        candidates.push(Candidate {
            field: SemanticField::Availability,
            score: AVAILABILITY_SCORE,
        });
    }

    if label.contains("attest") && field_type.is_choice() {
        candidates.push(Candidate {
            field: SemanticField::Attestation,
            score: ATTESTATION_SCORE,
        });
    }

    candidates
        .into_iter()
        .filter(|candidate| candidate.score > 0.0 && state.can_take(candidate.field, candidate.score))
        .fold(None, |best: Option<Candidate>, candidate| match best {
            Some(current) if current.score >= candidate.score => Some(current),
            _ => Some(candidate),
        })
}

fn containment_score(label: &str, key: &str) -> f64 {
    let (a, b) = (label.chars().count() as f64, key.chars().count() as f64);
    a.min(b) / a.max(b) * CONTAINMENT_WEIGHT
}

fn reference_facet_matches(label: &str, reference: u8, facet: ReferenceFacet) -> bool {
    let marker = match reference {
        1 => "reference 1",
        _ => "reference 2",
    };
    label.contains(marker) && label.contains(facet.keyword())
}
