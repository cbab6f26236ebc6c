use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::{
    drafts::DraftBlock,
    hash::content_hash,
    model::{Block, BlockId, BlockMeta, Document},
};

/// Source keys mapped to the stable ids they were given.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdMapping(BTreeMap<String, BlockId>);

impl IdMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source_key: &str) -> Option<BlockId> {
        self.0.get(source_key).copied()
    }

    pub fn insert(&mut self, source_key: impl Into<String>, id: BlockId) {
        self.0.insert(source_key.into(), id);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, BlockId)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Result of reconciling a new draft tree with the previous document.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub document: Document,
    /// Ids with no block in the previous document, in document order.
    pub new_block_ids: Vec<BlockId>,
    /// Ids whose content hash changed, in document order.
    pub modified_block_ids: Vec<BlockId>,
    /// Previous ids that no draft claimed, in previous document order.
    pub deleted_block_ids: Vec<BlockId>,
    /// Mapping to pass to the next reconciliation.
    pub id_mapping: IdMapping,
}

impl Reconciliation {
    /// True when nothing was added, changed or removed.
    pub fn is_unchanged(&self) -> bool {
        self.new_block_ids.is_empty()
            && self.modified_block_ids.is_empty()
            && self.deleted_block_ids.is_empty()
    }
}

/// Assigns stable ids to `new_tree` and diffs it against `previous`.
///
/// Drafts whose `source_key` is in `id_mapping` reuse the mapped id; the
/// others get a fresh v4 id. An id is never given to two blocks. Content
/// hashes are always recomputed and every block is stamped with the
/// reconciliation time. Nothing passed in is modified.
pub fn reconcile(
    new_tree: &[DraftBlock],
    previous: Option<&Document>,
    id_mapping: Option<&IdMapping>,
) -> Reconciliation {
    let mut assign = Assigner {
        mapping_in: id_mapping,
        mapping_out: IdMapping::new(),
        used: HashSet::new(),
        now: now_millis(),
    };
    let document = Document::new(new_tree.iter().map(|d| assign.block(d)).collect());

    let previous_hashes: HashMap<BlockId, &str> = previous
        .map(|doc| {
            doc.iter()
                .map(|b| (b.id, b.meta.content_hash.as_str()))
                .collect()
        })
        .unwrap_or_default();

    let mut new_block_ids = Vec::new();
    let mut modified_block_ids = Vec::new();
    for block in document.iter() {
        match previous_hashes.get(&block.id) {
            None => new_block_ids.push(block.id),
            Some(hash) if *hash != block.meta.content_hash => modified_block_ids.push(block.id),
            Some(_) => {}
        }
    }

    let deleted_block_ids = previous
        .map(|doc| {
            doc.iter()
                .map(|b| b.id)
                .filter(|id| !assign.used.contains(id))
                .collect()
        })
        .unwrap_or_default();

    Reconciliation {
        document,
        new_block_ids,
        modified_block_ids,
        deleted_block_ids,
        id_mapping: assign.mapping_out,
    }
}

struct Assigner<'a> {
    mapping_in: Option<&'a IdMapping>,
    mapping_out: IdMapping,
    used: HashSet<BlockId>,
    now: u64,
}

impl Assigner<'_> {
    fn block(&mut self, draft: &DraftBlock) -> Block {
        let id = self
            .mapping_in
            .and_then(|m| m.get(&draft.source_key))
            .filter(|id| !self.used.contains(id))
            .unwrap_or_else(BlockId::new);
        self.used.insert(id);
        self.mapping_out.insert(draft.source_key.clone(), id);

        let children: Vec<Block> = draft.children.iter().map(|c| self.block(c)).collect();
        let child_hashes: Vec<String> = children
            .iter()
            .map(|c| c.meta.content_hash.clone())
            .collect();

        Block {
            id,
            block_type: draft.block_type.clone(),
            props: draft.props.clone(),
            inline_content: draft.inline_content.clone(),
            meta: BlockMeta {
                content_hash: content_hash(
                    &draft.block_type,
                    &draft.props,
                    &draft.inline_content,
                    &child_hashes,
                ),
                modified_at: self.now,
            },
            children,
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
