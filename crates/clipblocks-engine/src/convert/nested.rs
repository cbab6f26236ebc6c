use super::{Conversion, payload::Converter, target::TargetBlock};
use crate::{
    identity::{Block, BlockType, Document},
    options::ConvertOptions,
};

/// Converts an identified document, nesting children inside their parent's
/// payload.
///
/// Children of blocks that cannot hold any are dropped and reported as
/// degraded. A missing document converts to nothing.
pub fn convert_document(document: Option<&Document>, options: &ConvertOptions) -> Conversion {
    let Some(document) = document else {
        return Conversion {
            blocks: Vec::new(),
            report: Converter::new(options, 0).report,
        };
    };

    let mut converter = Converter::new(options, document.blocks.len());
    let mut blocks = Vec::new();
    for block in &document.blocks {
        let converted = nest(&mut converter, block);
        converter.report.count(converted.is_some());
        blocks.extend(converted);
    }

    Conversion {
        blocks,
        report: converter.report,
    }
}

/// Whether a document block may carry children in the target API.
pub fn can_have_children(block: &Block) -> bool {
    match block.block_type {
        BlockType::Paragraph
        | BlockType::BulletedListItem
        | BlockType::NumberedListItem
        | BlockType::ToDo
        | BlockType::Toggle
        | BlockType::Quote
        | BlockType::Callout => true,
        BlockType::Heading => block.props.toggleable,
        _ => false,
    }
}

fn nest(converter: &mut Converter<'_>, block: &Block) -> Option<TargetBlock> {
    let mut payload = converter.payload(&block.block_type, &block.props, &block.inline_content)?;

    if !block.children.is_empty() {
        if can_have_children(block) {
            let children = block
                .children
                .iter()
                .filter_map(|child| nest(converter, child))
                .collect();
            if payload.set_children(children).is_err() {
                converter.degrade(format!(
                    "children of {} converted to {} dropped",
                    block.block_type.name(),
                    payload.type_name()
                ));
            }
        } else {
            converter.degrade(format!(
                "children of {} block dropped",
                block.block_type.name()
            ));
        }
    }

    converter.validated(TargetBlock::new(payload))
}
