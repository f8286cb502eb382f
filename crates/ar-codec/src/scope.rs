//! Scope block expand/flatten.

use ar_core::Scope;

use crate::schema::ScopeBlock;

/// Copy the declared scope kind and resource IDs; `None` without a block.
pub fn expand_scope(blocks: &[ScopeBlock]) -> Option<Scope> {
    let block = blocks.first()?;
    Some(Scope {
        scope_type: block.scope_type,
        values: block.resource_ids.iter().cloned().collect(),
    })
}

pub fn flatten_scope(scope: Option<&Scope>) -> Vec<ScopeBlock> {
    let Some(scope) = scope else {
        return Vec::new();
    };

    vec![ScopeBlock {
        scope_type: scope.scope_type,
        resource_ids: scope.values.iter().cloned().collect(),
    }]
}
