use super::{Conversion, payload::Converter, target::TargetBlock};
use crate::{
    identity::{DraftBlock, drafts_from_nodes},
    options::ConvertOptions,
    parsing::blocks::AbstractNode,
};

/// Converts parsed nodes into a flat block list.
///
/// Every node yields at most one block. A block whose node has children is
/// flagged with `has_children` and its converted children follow it
/// directly, depth first. Children of a node that could not be converted
/// are still emitted.
pub fn convert_nodes(nodes: &[AbstractNode], options: &ConvertOptions) -> Conversion {
    let drafts = drafts_from_nodes(nodes);
    let mut converter = Converter::new(options, drafts.len());
    let mut blocks = Vec::new();

    for draft in &drafts {
        let converted = flatten(&mut converter, draft, &mut blocks);
        converter.report.count(converted);
    }

    Conversion {
        blocks,
        report: converter.report,
    }
}

/// Pushes `draft` and its descendants. Returns whether `draft` itself made it.
fn flatten(converter: &mut Converter<'_>, draft: &DraftBlock, out: &mut Vec<TargetBlock>) -> bool {
    let block = converter
        .payload(&draft.block_type, &draft.props, &draft.inline_content)
        .map(|payload| TargetBlock {
            payload,
            has_children: (!draft.children.is_empty()).then_some(true),
        })
        .and_then(|block| converter.validated(block));

    let converted = block.is_some();
    out.extend(block);
    for child in &draft.children {
        flatten(converter, child, out);
    }
    converted
}
