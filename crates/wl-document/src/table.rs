//! Table and description list payloads.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::node::{Inlines, Node};

/// One term group of a description list.
///
/// `terms` and `description` are [`NodeKind::ListItem`](crate::NodeKind::ListItem)
/// nodes; the description may carry both principal text and child blocks.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DlistEntry {
    pub terms: Vec<Node>,
    pub description: Option<Node>,
}

impl DlistEntry {
    #[must_use]
    pub fn new(terms: Vec<Node>, description: Option<Node>) -> Self {
        Self { terms, description }
    }
}

/// Table payload of a [`NodeKind::Table`](crate::NodeKind::Table) node.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Table {
    pub columns: Vec<Column>,
    pub head: Vec<Row>,
    pub body: Vec<Row>,
    pub foot: Vec<Row>,
}

pub type Row = Vec<Cell>;

/// Row group of a table, in rendering order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Head,
    Body,
    Foot,
}

impl Section {
    /// Element suffix: `head`, `body`, `foot` (as in `<thead>`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Body => "body",
            Self::Foot => "foot",
        }
    }
}

impl Table {
    /// Total number of rows across all groups.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.head.len() + self.body.len() + self.foot.len()
    }

    /// Row groups in rendering order.
    #[must_use]
    pub fn sections(&self) -> [(Section, &[Row]); 3] {
        [
            (Section::Head, self.head.as_slice()),
            (Section::Body, self.body.as_slice()),
            (Section::Foot, self.foot.as_slice()),
        ]
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.head
            .iter_mut()
            .chain(self.body.iter_mut())
            .chain(self.foot.iter_mut())
            .flatten()
    }
}

/// Column specification.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Column {
    /// Width as a percentage of the table width.
    pub pcwidth: Option<f64>,
    pub autowidth: bool,
}

impl Column {
    #[must_use]
    pub fn with_width(pcwidth: f64) -> Self {
        Self {
            pcwidth: Some(pcwidth),
            autowidth: false,
        }
    }

    #[must_use]
    pub fn auto() -> Self {
        Self {
            pcwidth: None,
            autowidth: true,
        }
    }
}

/// Content style of a table cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum CellStyle {
    #[default]
    Default,
    Asciidoc,
    Literal,
    Header,
    Emphasis,
    Strong,
    Monospaced,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl HAlign {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl VAlign {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }
}

/// A table cell.
///
/// Text cells hold one inline sequence per paragraph; `asciidoc` cells hold
/// nested blocks; `literal` cells hold verbatim `source`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Cell {
    pub style: CellStyle,
    pub paragraphs: Vec<Inlines>,
    pub blocks: Vec<Node>,
    pub source: Option<String>,
    pub colspan: Option<u32>,
    pub rowspan: Option<u32>,
    pub halign: HAlign,
    pub valign: VAlign,
}

impl Cell {
    /// Single-paragraph text cell.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            paragraphs: vec![vec![Node::plain(text)]],
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: CellStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_paragraph(mut self, paragraph: Inlines) -> Self {
        self.paragraphs.push(paragraph);
        self
    }

    #[must_use]
    pub fn with_colspan(mut self, colspan: u32) -> Self {
        self.colspan = Some(colspan);
        self
    }

    #[must_use]
    pub fn with_rowspan(mut self, rowspan: u32) -> Self {
        self.rowspan = Some(rowspan);
        self
    }

    #[must_use]
    pub fn with_align(mut self, halign: HAlign, valign: VAlign) -> Self {
        self.halign = halign;
        self.valign = valign;
        self
    }
}
