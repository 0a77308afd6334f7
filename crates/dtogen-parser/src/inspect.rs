//! Inspection of previously generated DTO files.
//!
//! A generated DTO may contain custom-code sections delimited by marker
//! comments:
//!
//! ```text
//! ////BCC/ BEGIN CUSTOM CODE SECTION
//! public string DisplayName { get; set; }
//! ////ECC/ END CUSTOM CODE SECTION
//! ```
//!
//! Everything between the markers belongs to the user. Everything else is
//! owned by the generator and may be replaced on the next run.

use crate::entities::{has_base_dto, has_marker_attribute};
use crate::syntax;
use crate::treesitter::SourceUnit;
use serde::Serialize;
use std::ops::Range;
use tree_sitter::Node;

/// Prefix of the comment opening a custom-code section.
pub const CUSTOM_CODE_BEGIN: &str = "////BCC/";
/// Prefix of the comment closing a custom-code section.
pub const CUSTOM_CODE_END: &str = "////ECC/";
/// Full begin marker line as the generator writes it.
pub const CUSTOM_CODE_BEGIN_LINE: &str = "////BCC/ BEGIN CUSTOM CODE SECTION";
/// Full end marker line as the generator writes it.
pub const CUSTOM_CODE_END_LINE: &str = "////ECC/ END CUSTOM CODE SECTION";

/// Finds the first listed base type of the unit's first class.
pub struct BaseTypeLocator;

impl BaseTypeLocator {
    pub fn locate(unit: &SourceUnit) -> Option<&str> {
        let class = syntax::first_class(&unit.root())?;
        syntax::first_base_type(unit, &class)
    }
}

/// Byte ranges of the custom-code sections of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomCodeRegions {
    regions: Vec<Range<usize>>,
}

impl CustomCodeRegions {
    pub fn regions(&self) -> &[Range<usize>] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Whether `span` lies entirely inside one custom-code section.
    pub fn contains(&self, span: &Range<usize>) -> bool {
        self.regions
            .iter()
            .any(|r| r.start <= span.start && span.end <= r.end)
    }
}

/// Scans comments for custom-code markers.
///
/// A begin marker opens a section at the comment's first byte; the next end
/// marker closes it at the comment's last byte. A begin marker with no end
/// extends the section to end of file. An end marker with no open section,
/// and a begin marker inside an open section, are ignored.
pub struct CustomCodeLocator<'s> {
    unit: &'s SourceUnit,
    open: Option<usize>,
    regions: Vec<Range<usize>>,
}

impl<'s> CustomCodeLocator<'s> {
    pub fn new(unit: &'s SourceUnit) -> Self {
        Self {
            unit,
            open: None,
            regions: Vec::new(),
        }
    }

    pub fn locate(mut self) -> CustomCodeRegions {
        let unit = self.unit;
        self.visit(&unit.root());
        if let Some(start) = self.open.take() {
            self.regions.push(start..self.unit.text().len());
        }
        CustomCodeRegions {
            regions: self.regions,
        }
    }

    fn visit(&mut self, node: &Node<'_>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "comment" => self.visit_comment(&child),
                _ => self.visit(&child),
            }
        }
    }

    fn visit_comment(&mut self, comment: &Node<'_>) {
        let text = self.unit.node_text(comment).trim_start();
        if text.starts_with(CUSTOM_CODE_BEGIN) {
            if self.open.is_none() {
                self.open = Some(comment.start_byte());
            }
        } else if text.starts_with(CUSTOM_CODE_END)
            && let Some(start) = self.open.take()
        {
            self.regions.push(start..comment.end_byte());
        }
    }
}

/// Collects the names of generator-owned properties: every property
/// declaration that does not sit inside a custom-code section.
pub struct GeneratedPropertiesEnumerator<'r> {
    regions: &'r CustomCodeRegions,
}

impl<'r> GeneratedPropertiesEnumerator<'r> {
    pub fn new(regions: &'r CustomCodeRegions) -> Self {
        Self { regions }
    }

    pub fn enumerate(&self, unit: &SourceUnit) -> Vec<String> {
        syntax::all_properties(&unit.root())
            .iter()
            .filter(|p| !self.regions.contains(&p.byte_range()))
            .filter_map(|p| syntax::declaration_name(unit, p))
            .map(String::from)
            .collect()
    }
}

/// Custom-code sections of a unit.
pub fn custom_code_regions(unit: &SourceUnit) -> CustomCodeRegions {
    CustomCodeLocator::new(unit).locate()
}

/// Names of the properties the generator owns in an existing DTO, in
/// source order. `None` when there is no existing file.
pub fn get_auto_generated_properties(existing: Option<&SourceUnit>) -> Option<Vec<String>> {
    let unit = existing?;
    let regions = custom_code_regions(unit);
    Some(GeneratedPropertiesEnumerator::new(&regions).enumerate(unit))
}

/// Everything a regeneration run needs to know about an existing DTO.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExistingDtoReport {
    pub exists: bool,
    pub base_dto_name: Option<String>,
    pub has_base_dto: bool,
    pub has_data_contract: bool,
    pub custom_code_sections: usize,
    pub auto_generated_properties: Vec<String>,
}

/// Inspect an existing DTO. An absent file gives the empty baseline.
pub fn inspect_existing(
    existing: Option<&SourceUnit>,
    expected_base_dto_name: Option<&str>,
) -> ExistingDtoReport {
    let Some(unit) = existing else {
        return ExistingDtoReport::default();
    };
    let regions = custom_code_regions(unit);
    ExistingDtoReport {
        exists: true,
        base_dto_name: BaseTypeLocator::locate(unit).map(String::from),
        has_base_dto: expected_base_dto_name.is_some_and(|name| has_base_dto(existing, name)),
        has_data_contract: has_marker_attribute(existing),
        custom_code_sections: regions.len(),
        auto_generated_properties: GeneratedPropertiesEnumerator::new(&regions).enumerate(unit),
    }
}
