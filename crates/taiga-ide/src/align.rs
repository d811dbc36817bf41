use taiga_types::ParamDef;

/// One alignment decision for a target parameter: the name the corrected
/// signature will use, and the index of the candidate parameter it consumed
/// (when one was recovered from the existing declaration rather than
/// synthesized from the target).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedParam {
    pub name: String,
    pub candidate: Option<usize>,
}

impl AlignedParam {
    pub fn matched(&self) -> bool {
        self.candidate.is_some()
    }
}

/// Align `target` parameters (from the supertype/expected signature, with
/// types already substituted into the subtype's context) against `candidate`
/// parameters (from the existing declaration).
///
/// Two greedy passes, name first: a parameter the user renamed but kept the
/// type of is recovered by name; reordered parameters with matching types
/// fall back to type identity. Each candidate parameter is consumed at most
/// once, and the result has exactly one decision per target parameter.
pub fn align(target: &[ParamDef], candidate: &[ParamDef]) -> Vec<AlignedParam> {
    let mut used = vec![false; candidate.len()];
    let mut out: Vec<Option<AlignedParam>> = vec![None; target.len()];

    // Name pass.
    for (slot, target_param) in target.iter().enumerate() {
        for (idx, cand) in candidate.iter().enumerate() {
            if used[idx] || cand.name != target_param.name {
                continue;
            }
            used[idx] = true;
            out[slot] = Some(AlignedParam {
                name: cand.name.clone(),
                candidate: Some(idx),
            });
            break;
        }
    }

    // Type pass over the still-unmatched slots.
    for (slot, target_param) in target.iter().enumerate() {
        if out[slot].is_some() {
            continue;
        }
        for (idx, cand) in candidate.iter().enumerate() {
            if used[idx] || cand.ty != target_param.ty {
                continue;
            }
            used[idx] = true;
            out[slot] = Some(AlignedParam {
                name: cand.name.clone(),
                candidate: Some(idx),
            });
            break;
        }
    }

    // Anything left keeps the target's own name.
    out.into_iter()
        .zip(target)
        .map(|(decision, target_param)| {
            decision.unwrap_or_else(|| AlignedParam {
                name: target_param.name.clone(),
                candidate: None,
            })
        })
        .collect()
}
