//! Per-block conversion rules shared by both converters.

use clipblocks_syntax::kinds::callout::DEFAULT_ICON;

use super::{
    report::ConversionReport,
    rules::{heading_level, is_pdf, is_valid_audio_url, normalize_language, resolve_color},
    target::{
        BlockPayload, BookmarkBlock, CalloutBlock, CodeBlock, EmptyBlock, EquationBlock, FileBlock,
        HeadingBlock, Icon, RichText, TableBlock, TableRowBlock, TargetBlock, TextBlock, ToDoBlock,
    },
    validate::validate_block,
};
use crate::{
    identity::{BlockProps, BlockType},
    options::ConvertOptions,
    parsing::{
        blocks::{EMPTY_TABLE, TableData},
        inline::{
            Annotations, StyledSegment, parse_inline, plain_text, sanitize_url,
            split_long_segments,
        },
    },
};

/// Conversion state for one call: the options and the report being built.
pub(crate) struct Converter<'a> {
    options: &'a ConvertOptions,
    pub(crate) report: ConversionReport,
}

impl<'a> Converter<'a> {
    pub(crate) fn new(options: &'a ConvertOptions, blocks_input: usize) -> Self {
        Self {
            options,
            report: ConversionReport::new(blocks_input),
        }
    }

    pub(crate) fn degrade(&mut self, message: String) {
        if self.options.diagnostics {
            log::warn!("degraded: {message}");
        }
        self.report.degrade(message);
    }

    fn error(&mut self, message: String) {
        if self.options.diagnostics {
            log::error!("{message}");
        }
        self.report.error(message);
    }

    /// Serializes and checks a finished block; invalid blocks are dropped.
    pub(crate) fn validated(&mut self, block: TargetBlock) -> Option<TargetBlock> {
        let checked = serde_json::to_value(&block)
            .map_err(|e| e.to_string())
            .and_then(|value| validate_block(&value).map_err(|e| e.to_string()));
        match checked {
            Ok(()) => {
                if self.options.diagnostics {
                    log::debug!("converted {} block", block.type_name());
                }
                Some(block)
            }
            Err(message) => {
                self.error(format!("dropped invalid {} block: {message}", block.type_name()));
                None
            }
        }
    }

    fn rich(&self, segments: &[StyledSegment]) -> Vec<RichText> {
        split_long_segments(segments.to_vec(), self.options.max_rich_text_len)
            .iter()
            .map(RichText::from_segment)
            .collect()
    }

    /// Unstyled runs of `text`, split at the length limit.
    fn rich_plain(&self, text: &str) -> Vec<RichText> {
        if text.is_empty() {
            return Vec::new();
        }
        self.rich(&[StyledSegment::text(text)])
    }

    /// Builds the payload for one block, or `None` when it has no target form.
    pub(crate) fn payload(
        &mut self,
        block_type: &BlockType,
        props: &BlockProps,
        inline: &[StyledSegment],
    ) -> Option<BlockPayload> {
        if props.dropped_inline > 0 {
            self.degrade(format!(
                "{} block: skipped {} unreadable inline item(s)",
                block_type.name(),
                props.dropped_inline
            ));
        }
        let rich_text = self.rich(inline);
        let color = resolve_color(props.text_color.as_deref(), props.background_color.as_deref());
        let text_block = |rich_text| TextBlock::new(rich_text).with_color(color.clone());
        let payload = match block_type {
            BlockType::Paragraph => BlockPayload::Paragraph(text_block(rich_text)),
            BlockType::Heading => {
                let heading = HeadingBlock {
                    rich_text,
                    color: color.clone(),
                    is_toggleable: props.toggleable,
                    children: Vec::new(),
                };
                match heading_level(props.level, "heading") {
                    1 => BlockPayload::Heading1(heading),
                    2 => BlockPayload::Heading2(heading),
                    _ => BlockPayload::Heading3(heading),
                }
            }
            BlockType::BulletedListItem => BlockPayload::BulletedListItem(text_block(rich_text)),
            BlockType::NumberedListItem => BlockPayload::NumberedListItem(text_block(rich_text)),
            BlockType::ToDo => BlockPayload::ToDo(ToDoBlock {
                rich_text,
                checked: props.checked.unwrap_or(false),
                color: color.clone(),
                children: Vec::new(),
            }),
            BlockType::Toggle => BlockPayload::Toggle(text_block(rich_text)),
            BlockType::Quote => BlockPayload::Quote(text_block(rich_text)),
            BlockType::Callout => BlockPayload::Callout(CalloutBlock {
                rich_text,
                icon: Icon::Emoji {
                    emoji: props.icon.clone().unwrap_or_else(|| DEFAULT_ICON.to_string()),
                },
                color: color.clone(),
                children: Vec::new(),
            }),
            BlockType::Code => self.code(props, inline),
            BlockType::Equation => self.equation(props, inline)?,
            BlockType::Table => self.table(props.table.as_ref()),
            BlockType::Divider => BlockPayload::Divider(EmptyBlock {}),
            BlockType::TableOfContents => BlockPayload::TableOfContents(EmptyBlock {}),
            BlockType::Breadcrumb => BlockPayload::Breadcrumb(EmptyBlock {}),
            BlockType::Image | BlockType::Video | BlockType::Audio | BlockType::File => {
                self.media(block_type, props, inline)?
            }
            BlockType::Bookmark => match props.url.as_deref().and_then(sanitize_url) {
                Some(url) => BlockPayload::Bookmark(BookmarkBlock {
                    url,
                    caption: self.rich_plain(props.caption.as_deref().unwrap_or_default()),
                }),
                None => self.fallback_paragraph("bookmark", props, inline)?,
            },
            BlockType::Unsupported(name) => {
                self.degrade(format!("unsupported block type `{name}` dropped"));
                return None;
            }
        };
        Some(payload)
    }

    fn code(&mut self, props: &BlockProps, inline: &[StyledSegment]) -> BlockPayload {
        let code = plain_text(inline);
        if props.inline {
            let annotations = Annotations {
                code: true,
                ..Default::default()
            };
            return BlockPayload::Paragraph(TextBlock::new(
                self.rich(&[StyledSegment::styled(code, annotations)]),
            ));
        }
        BlockPayload::Code(CodeBlock {
            rich_text: self.rich_plain(&code),
            caption: self.rich_plain(props.caption.as_deref().unwrap_or_default()),
            language: normalize_language(props.language.as_deref().unwrap_or_default()),
        })
    }

    fn equation(&mut self, props: &BlockProps, inline: &[StyledSegment]) -> Option<BlockPayload> {
        let expression = props
            .expression
            .clone()
            .unwrap_or_else(|| plain_text(inline))
            .trim()
            .to_string();
        if expression.is_empty() {
            self.degrade("empty equation dropped".to_string());
            return None;
        }
        if props.inline {
            return Some(BlockPayload::Paragraph(TextBlock::new(vec![
                RichText::from_segment(&StyledSegment::equation(expression)),
            ])));
        }
        Some(BlockPayload::Equation(EquationBlock { expression }))
    }

    fn table(&mut self, table: Option<&TableData>) -> BlockPayload {
        let width = table.map_or(0, TableData::width);
        let Some(table) = table.filter(|_| width > 0) else {
            self.degrade("table without columns replaced by placeholder".to_string());
            return BlockPayload::Paragraph(TextBlock::new(self.rich_plain(EMPTY_TABLE)));
        };
        let table = table.clone().normalized();

        let rows: Vec<TargetBlock> = table
            .headers
            .iter()
            .chain(table.rows.iter())
            .map(|row| {
                let cells = row
                    .iter()
                    .map(|cell| self.rich(&parse_inline(cell)))
                    .collect();
                TargetBlock::new(BlockPayload::TableRow(TableRowBlock { cells }))
            })
            .collect();

        BlockPayload::Table(TableBlock {
            table_width: width,
            has_column_header: table.headers.is_some(),
            has_row_header: false,
            children: rows,
        })
    }

    fn media(
        &mut self,
        block_type: &BlockType,
        props: &BlockProps,
        inline: &[StyledSegment],
    ) -> Option<BlockPayload> {
        let Some(url) = props.url.as_deref().and_then(sanitize_url) else {
            return self.fallback_paragraph(media_name(block_type), props, inline);
        };
        let caption = self.rich_plain(props.caption.as_deref().unwrap_or_default());
        let payload = match block_type {
            BlockType::Image => BlockPayload::Image(FileBlock::external(url, caption)),
            BlockType::Video => BlockPayload::Video(FileBlock::external(url, caption)),
            BlockType::Audio if is_valid_audio_url(&url) => {
                BlockPayload::Audio(FileBlock::external(url, caption))
            }
            BlockType::Audio => {
                self.degrade(format!("audio {url} converted to bookmark"));
                BlockPayload::Bookmark(BookmarkBlock { url, caption })
            }
            _ if is_pdf(&url, props.mime.as_deref()) => {
                BlockPayload::Pdf(FileBlock::external(url, caption))
            }
            _ => BlockPayload::File(FileBlock::external(url, caption)),
        };
        Some(payload)
    }

    /// A paragraph with the block's original text, for blocks without a
    /// usable URL.
    fn fallback_paragraph(
        &mut self,
        kind: &str,
        props: &BlockProps,
        inline: &[StyledSegment],
    ) -> Option<BlockPayload> {
        let text = [
            plain_text(inline),
            props.caption.clone().unwrap_or_default(),
            props.url.clone().unwrap_or_default(),
        ]
        .into_iter()
        .find(|t| !t.trim().is_empty());

        match text {
            Some(text) => {
                self.degrade(format!("{kind} without usable URL converted to paragraph"));
                Some(BlockPayload::Paragraph(TextBlock::new(self.rich_plain(&text))))
            }
            None => {
                self.degrade(format!("{kind} without URL or text dropped"));
                None
            }
        }
    }
}

fn media_name(block_type: &BlockType) -> &'static str {
    match block_type {
        BlockType::Image => "image",
        BlockType::Video => "video",
        BlockType::Audio => "audio",
        _ => "file",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn convert(block_type: BlockType, props: BlockProps, text: &str) -> (Option<BlockPayload>, ConversionReport) {
        let options = ConvertOptions::default();
        let mut c = Converter::new(&options, 1);
        let payload = c.payload(&block_type, &props, &parse_inline(text));
        (payload, c.report)
    }

    fn media(block_type: BlockType, url: &str) -> (Option<BlockPayload>, ConversionReport) {
        let props = BlockProps {
            url: Some(url.to_string()),
            ..Default::default()
        };
        convert(block_type, props, "")
    }

    #[test]
    fn heading_level_clamps_to_three() {
        let props = BlockProps {
            level: Some(5),
            ..Default::default()
        };
        let (payload, _) = convert(BlockType::Heading, props, "x");
        assert_eq!(payload.map(|p| p.type_name()), Some("heading_3"));
    }

    #[test]
    fn placeholder_audio_becomes_bookmark() {
        let (payload, report) = media(BlockType::Audio, "https://example.com/test.mp3");
        assert_eq!(payload.map(|p| p.type_name()), Some("bookmark"));
        assert_eq!(report.degraded.len(), 1);
    }

    #[test]
    fn real_audio_stays_audio() {
        let (payload, report) = media(BlockType::Audio, "https://cdn.music.io/song.mp3");
        assert_eq!(payload.map(|p| p.type_name()), Some("audio"));
        assert!(report.degraded.is_empty());
    }

    #[test]
    fn pdf_by_extension_and_mime() {
        let (payload, _) = media(BlockType::File, "https://x.io/a.pdf");
        assert_eq!(payload.map(|p| p.type_name()), Some("pdf"));

        let props = BlockProps {
            url: Some("https://x.io/download".into()),
            mime: Some("application/pdf".into()),
            ..Default::default()
        };
        let (payload, _) = convert(BlockType::File, props, "");
        assert_eq!(payload.map(|p| p.type_name()), Some("pdf"));

        let (payload, _) = media(BlockType::File, "https://x.io/a.zip");
        assert_eq!(payload.map(|p| p.type_name()), Some("file"));
    }

    #[test]
    fn media_without_url_keeps_text() {
        let (payload, report) = convert(BlockType::Image, BlockProps::default(), "a cat");
        let payload = payload.unwrap();
        assert_eq!(payload.type_name(), "paragraph");
        assert_eq!(payload.rich_text()[0].content(), "a cat");
        assert_eq!(report.degraded.len(), 1);
    }

    #[test]
    fn unsupported_is_dropped_and_recorded() {
        let (payload, report) = convert(BlockType::Unsupported("kanban".into()), BlockProps::default(), "x");
        assert!(payload.is_none());
        assert_eq!(report.degraded, vec!["unsupported block type `kanban` dropped"]);
    }

    #[test]
    fn code_is_one_plain_run_with_normalized_language() {
        let props = BlockProps {
            language: Some("TS".into()),
            ..Default::default()
        };
        let options = ConvertOptions::default();
        let mut c = Converter::new(&options, 1);
        let payload = c.payload(&BlockType::Code, &props, &[StyledSegment::text("let **x** = 1;")]);
        let Some(BlockPayload::Code(code)) = payload else {
            panic!("expected code block");
        };
        assert_eq!(code.language, "typescript");
        assert_eq!(code.rich_text.len(), 1);
        assert_eq!(code.rich_text[0].content(), "let **x** = 1;");
        assert!(!code.rich_text[0].annotations().bold);
    }

    #[test]
    fn inline_code_and_equation_become_paragraphs() {
        let props = BlockProps {
            inline: true,
            ..Default::default()
        };
        let options = ConvertOptions::default();
        let mut c = Converter::new(&options, 1);
        let code = c
            .payload(&BlockType::Code, &props, &[StyledSegment::text("x")])
            .unwrap();
        assert_eq!(code.type_name(), "paragraph");
        assert!(code.rich_text()[0].annotations().code);

        let eq_props = BlockProps {
            inline: true,
            expression: Some("e=mc^2".into()),
            ..Default::default()
        };
        let eq = c.payload(&BlockType::Equation, &eq_props, &[]).unwrap();
        assert_eq!(eq.type_name(), "paragraph");
        assert!(matches!(eq.rich_text()[0], RichText::Equation { .. }));
    }

    #[test]
    fn table_rows_include_header() {
        let props = BlockProps {
            table: Some(TableData {
                headers: Some(vec!["a".into(), "b".into()]),
                rows: vec![vec!["1".into()]],
            }),
            ..Default::default()
        };
        let (payload, _) = convert(BlockType::Table, props, "");
        let Some(BlockPayload::Table(table)) = payload else {
            panic!("expected table");
        };
        assert_eq!(table.table_width, 2);
        assert!(table.has_column_header);
        assert_eq!(table.children.len(), 2);
        assert!(table.children.iter().all(|r| r.type_name() == "table_row"));
    }

    #[test]
    fn empty_table_is_placeholder_paragraph() {
        let (payload, _) = convert(BlockType::Table, BlockProps::default(), "");
        let payload = payload.unwrap();
        assert_eq!(payload.type_name(), "paragraph");
        assert_eq!(payload.rich_text()[0].content(), EMPTY_TABLE);
    }

    #[test]
    fn long_text_is_split() {
        let options = ConvertOptions {
            max_rich_text_len: 4,
            ..Default::default()
        };
        let mut c = Converter::new(&options, 1);
        let payload = c
            .payload(&BlockType::Paragraph, &BlockProps::default(), &parse_inline("abcdefghij"))
            .unwrap();
        let parts: Vec<_> = payload.rich_text().iter().map(|r| r.content()).collect();
        assert_eq!(parts, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn callout_defaults() {
        let (payload, _) = convert(BlockType::Callout, BlockProps::default(), "note");
        let Some(BlockPayload::Callout(callout)) = payload else {
            panic!("expected callout");
        };
        assert_eq!(callout.icon, Icon::Emoji { emoji: DEFAULT_ICON.to_string() });
        assert_eq!(callout.color, "default");
    }

    #[test]
    fn colors_reach_text_blocks_and_headings() {
        let props = BlockProps {
            background_color: Some("red".into()),
            ..Default::default()
        };
        let (payload, _) = convert(BlockType::Paragraph, props, "p");
        let Some(BlockPayload::Paragraph(paragraph)) = payload else {
            panic!("expected paragraph");
        };
        assert_eq!(paragraph.color, "red_background");

        let props = BlockProps {
            level: Some(2),
            text_color: Some("green".into()),
            ..Default::default()
        };
        let (payload, _) = convert(BlockType::Heading, props, "h");
        let Some(BlockPayload::Heading2(heading)) = payload else {
            panic!("expected heading");
        };
        assert_eq!(heading.color, "green");
    }

    #[test]
    fn dropped_inline_items_are_reported() {
        let props = BlockProps {
            dropped_inline: 2,
            ..Default::default()
        };
        let (payload, report) = convert(BlockType::Paragraph, props, "kept");
        assert!(payload.is_some());
        assert_eq!(report.degraded.len(), 1);
        assert!(report.degraded[0].contains("2 unreadable"), "{:?}", report.degraded);
    }
}
