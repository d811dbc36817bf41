//! Signature quick fixes for Taiga.
//!
//! Given a semantic diagnostic attached to a declaration, this crate computes
//! corrected signatures (or trivial text edits) that would resolve it. The
//! heart is the reconciliation engine in [`reconcile`]: it localizes a target
//! signature's types to the subtype's context, aligns parameters between the
//! target and the existing declaration, and renders the corrected signature
//! in both a short display form and a fully qualified source form.
//!
//! The engine only ever returns rendered text plus a target descriptor; the
//! host applies (or discards) the edit inside its own document transaction.

mod align;
mod quick_fix;
mod reconcile;
mod signature;

pub use align::{align, AlignedParam};
pub use quick_fix::{quick_fixes, SignatureDiagnostic};
pub use reconcile::{CandidateFix, FixOutcome, FixTarget};
pub use signature::{render_signature, FunctionSignature, TypeParamDecl};
