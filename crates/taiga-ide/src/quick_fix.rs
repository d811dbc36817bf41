use serde::{Deserialize, Serialize};
use taiga_core::{CancellationToken, Span, TextEdit};
use taiga_types::{ClassId, FunctionId, Type, TypeEnv};

use crate::reconcile::{
    override_mismatch_fixes, supertype_call_fixes, CandidateFix, FixOutcome, FixTarget,
};

/// The diagnostic kinds this crate can fix, each carrying exactly the payload
/// its fix needs.
///
/// This is a closed sum routed by a plain `match` in [`quick_fixes`]; there
/// is deliberately no registry or extension point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SignatureDiagnostic {
    /// A declaration marked `override` matches no supertype member.
    NothingToOverride { function: FunctionId },
    /// A supertype entry lacks the constructor call its superclass requires.
    SupertypeNotInitialized { class: ClassId, supertype: Type },
    /// The inherited class is final; offered fix makes it open.
    FinalSupertype {
        class_name: String,
        keyword_offset: usize,
    },
    /// A type-parameter upper bound names a final class.
    FinalUpperBound {
        class_name: String,
        keyword_offset: usize,
    },
    /// `override` on a declaration that overrides nothing and should simply
    /// drop the modifier.
    RedundantOverride { modifier_span: Span },
}

/// Compute quick fixes for one diagnostic.
///
/// Cancellation aborts the whole computation and yields [`FixOutcome::None`];
/// an empty candidate set is likewise a silent no-op. The engine never
/// mutates documents; every returned candidate is rendered text plus a
/// target descriptor for the host to apply.
pub fn quick_fixes(
    env: &dyn TypeEnv,
    diagnostic: &SignatureDiagnostic,
    token: &CancellationToken,
) -> FixOutcome {
    let candidates = match diagnostic {
        SignatureDiagnostic::NothingToOverride { function } => {
            override_mismatch_fixes(env, *function, token)
        }
        SignatureDiagnostic::SupertypeNotInitialized { class, supertype } => {
            supertype_call_fixes(env, *class, supertype, token)
        }
        SignatureDiagnostic::FinalSupertype {
            class_name,
            keyword_offset,
        }
        | SignatureDiagnostic::FinalUpperBound {
            class_name,
            keyword_offset,
        } => Ok(vec![make_class_open(class_name, *keyword_offset)]),
        SignatureDiagnostic::RedundantOverride { modifier_span } => {
            Ok(vec![remove_override_modifier(*modifier_span)])
        }
    };

    match candidates {
        Ok(candidates) => FixOutcome::from_candidates(candidates),
        Err(cancelled) => {
            tracing::debug!(?diagnostic, %cancelled, "quick-fix computation aborted");
            FixOutcome::None
        }
    }
}

fn make_class_open(class_name: &str, keyword_offset: usize) -> CandidateFix {
    CandidateFix {
        title: format!("Make '{class_name}' open"),
        source_text: "open ".to_string(),
        target: FixTarget::Edit(TextEdit::insert(keyword_offset, "open ")),
    }
}

fn remove_override_modifier(modifier_span: Span) -> CandidateFix {
    CandidateFix {
        title: "Remove 'override' modifier".to_string(),
        source_text: String::new(),
        target: FixTarget::Edit(TextEdit::delete(modifier_span)),
    }
}
