//! Subset-compatibility between class fingerprints.

use crate::model::ClassFingerprint;

impl ClassFingerprint {
    /// Tests whether `candidate` satisfies everything this fingerprint
    /// demands, facet by facet: superclass, interfaces, constructors,
    /// methods, fields.
    ///
    /// A facet this fingerprint leaves unset constrains nothing. A set
    /// collection facet requires every one of its elements to be present in
    /// the candidate; the candidate may declare more. The superclass scalar
    /// requires exact equality when both sides declare one, and passes when
    /// the candidate declares none even though this fingerprint does; that
    /// is the one place the null handling differs from the collection facets.
    ///
    /// The relation is not symmetric: a candidate with extra members stays
    /// compatible, the reverse does not.
    pub fn compatible(&self, candidate: &ClassFingerprint) -> bool {
        if !super_class_compatible(self.super_class(), candidate.super_class()) {
            return false;
        }
        if !facet_compatible(self.interfaces(), candidate.interfaces()) {
            return false;
        }
        if !facet_compatible(self.constructors(), candidate.constructors()) {
            return false;
        }
        if !facet_compatible(self.methods(), candidate.methods()) {
            return false;
        }
        facet_compatible(self.fields(), candidate.fields())
    }
}

fn super_class_compatible(reference: Option<&str>, candidate: Option<&str>) -> bool {
    match (reference, candidate) {
        (None, _) => true,
        (Some(_), None) => true,
        (Some(reference), Some(candidate)) => reference == candidate,
    }
}

fn facet_compatible<T: Ord>(reference: Option<&[T]>, candidate: Option<&[T]>) -> bool {
    match (reference, candidate) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(reference), Some(candidate)) => contains_all(candidate, reference),
    }
}

/// Every required element must be found in `candidate`. Both slices are
/// sorted at construction time, so each probe is a binary search and the
/// scan stops at the first miss.
fn contains_all<T: Ord>(candidate: &[T], required: &[T]) -> bool {
    required
        .iter()
        .all(|item| candidate.binary_search(item).is_ok())
}
