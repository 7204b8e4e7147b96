//! Theme colour scheme.
//!
//! A theme binds the twelve scheme slots (`dk1`, `lt1`, ..., `folHlink`) to
//! concrete colours. It is loaded once per presentation and shared read-only
//! by every slide's colour map.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::errors::ThemeError;
use crate::log;
use crate::types::Rgb;

/// The twelve colour roles of a DrawingML colour scheme, in scheme order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SchemeSlot {
    Dk1,
    Lt1,
    Dk2,
    Lt2,
    Accent1,
    Accent2,
    Accent3,
    Accent4,
    Accent5,
    Accent6,
    Hlink,
    FolHlink,
}

impl SchemeSlot {
    pub const ALL: [SchemeSlot; 12] = [
        SchemeSlot::Dk1,
        SchemeSlot::Lt1,
        SchemeSlot::Dk2,
        SchemeSlot::Lt2,
        SchemeSlot::Accent1,
        SchemeSlot::Accent2,
        SchemeSlot::Accent3,
        SchemeSlot::Accent4,
        SchemeSlot::Accent5,
        SchemeSlot::Accent6,
        SchemeSlot::Hlink,
        SchemeSlot::FolHlink,
    ];

    /// Element name used in the theme part
    pub fn name(self) -> &'static str {
        match self {
            SchemeSlot::Dk1 => "dk1",
            SchemeSlot::Lt1 => "lt1",
            SchemeSlot::Dk2 => "dk2",
            SchemeSlot::Lt2 => "lt2",
            SchemeSlot::Accent1 => "accent1",
            SchemeSlot::Accent2 => "accent2",
            SchemeSlot::Accent3 => "accent3",
            SchemeSlot::Accent4 => "accent4",
            SchemeSlot::Accent5 => "accent5",
            SchemeSlot::Accent6 => "accent6",
            SchemeSlot::Hlink => "hlink",
            SchemeSlot::FolHlink => "folHlink",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SchemeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A presentation's colour scheme
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Theme {
    colors: [Option<Rgb>; 12],
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, slot: SchemeSlot, rgb: Rgb) -> Self {
        self.set(slot, rgb);
        self
    }

    pub fn set(&mut self, slot: SchemeSlot, rgb: Rgb) {
        self.colors[slot.index()] = Some(rgb);
    }

    pub fn color(&self, slot: SchemeSlot) -> Option<Rgb> {
        self.colors[slot.index()]
    }

    /// Look a slot up by its element name
    pub fn get(&self, name: &str) -> Option<Rgb> {
        SchemeSlot::from_name(name).and_then(|slot| self.color(slot))
    }

    /// Defined slots in scheme order
    pub fn iter(&self) -> impl Iterator<Item = (SchemeSlot, Rgb)> + '_ {
        SchemeSlot::ALL
            .into_iter()
            .filter_map(|slot| self.color(slot).map(|rgb| (slot, rgb)))
    }

    pub fn is_empty(&self) -> bool {
        self.colors.iter().all(Option::is_none)
    }

    /// Build a theme from the document model's slot table.
    ///
    /// Names that are not scheme slots are ignored.
    pub fn from_slots(slots: &BTreeMap<String, Rgb>) -> Self {
        let mut theme = Theme::new();
        for (name, rgb) in slots {
            match SchemeSlot::from_name(name) {
                Some(slot) => theme.set(slot, *rgb),
                None => {
                    log::warn!(slot = %name, "ignoring unknown theme colour slot");
                }
            }
        }
        theme
    }

    /// Parse the colour scheme out of a DrawingML theme part.
    ///
    /// Only the main scheme (`themeElements/clrScheme`) is read; extra
    /// schemes are ignored. Each slot's first child supplies the colour:
    /// `srgbClr@val`, or the last rendered value of a system colour
    /// (`sysClr@lastClr`).
    pub fn from_xml(xml: &[u8]) -> Result<Self, ThemeError> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut theme = Theme::new();
        let mut in_color_scheme = false;
        let mut current_slot: Option<SchemeSlot> = None;
        // Local names of the open elements
        let mut open: Vec<Vec<u8>> = Vec::new();

        loop {
            let event = reader.read_event();
            let opens = matches!(event, Ok(Event::Start(_)));
            match event {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    let local = e.local_name();
                    match local.as_ref() {
                        b"clrScheme" => {
                            in_color_scheme =
                                open.last().is_some_and(|parent| parent.as_slice() == b"themeElements");
                        }
                        b"srgbClr" if in_color_scheme => {
                            if let Some(slot) = current_slot.take() {
                                let value = attribute(e, b"val")?;
                                theme.set(slot, parse_slot_color(slot, value)?);
                            }
                        }
                        b"sysClr" if in_color_scheme => {
                            if let Some(slot) = current_slot.take() {
                                let value = attribute(e, b"lastClr")?;
                                theme.set(slot, parse_slot_color(slot, value)?);
                            }
                        }
                        name if in_color_scheme => {
                            if let Some(slot) = std::str::from_utf8(name)
                                .ok()
                                .and_then(SchemeSlot::from_name)
                            {
                                current_slot = Some(slot);
                            }
                        }
                        _ => {}
                    }
                    if opens {
                        open.push(local.as_ref().to_vec());
                    }
                }
                Ok(Event::End(ref e)) => {
                    open.pop();
                    if e.local_name().as_ref() == b"clrScheme" {
                        in_color_scheme = false;
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ThemeError::Xml {
                        message: e.to_string(),
                    });
                }
                _ => {}
            }
        }

        log::debug!(slots = theme.iter().count(), "parsed theme colour scheme");
        Ok(theme)
    }

    /// Load the colour scheme from the first theme part of a `.pptx` package.
    pub fn from_package(path: &Path) -> Result<Self, ThemeError> {
        let file = File::open(path).map_err(|source| ThemeError::Package {
            path: path.to_path_buf(),
            source,
        })?;
        let mut archive = zip::ZipArchive::new(file).map_err(|source| ThemeError::Archive {
            path: path.to_path_buf(),
            source,
        })?;

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(|source| ThemeError::Archive {
                path: path.to_path_buf(),
                source,
            })?;
            let name = entry.name();
            if !(name.starts_with("ppt/theme/") && name.ends_with(".xml")) || name.contains("/_rels/")
            {
                continue;
            }
            log::debug!(part = %name, "reading theme part");
            let mut xml = Vec::new();
            entry
                .read_to_end(&mut xml)
                .map_err(|source| ThemeError::Package {
                    path: path.to_path_buf(),
                    source,
                })?;
            return Self::from_xml(&xml);
        }

        Err(ThemeError::NotFound {
            path: path.to_path_buf(),
        })
    }
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<String, ThemeError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| ThemeError::Xml {
            message: e.to_string(),
        })?;
        if attr.key.local_name().as_ref() == key {
            return Ok(String::from_utf8_lossy(&attr.value).into_owned());
        }
    }
    Err(ThemeError::Xml {
        message: format!(
            "<{}> has no `{}` attribute",
            String::from_utf8_lossy(e.local_name().as_ref()),
            String::from_utf8_lossy(key)
        ),
    })
}

fn parse_slot_color(slot: SchemeSlot, value: String) -> Result<Rgb, ThemeError> {
    value.parse().map_err(|_| ThemeError::InvalidColor {
        slot: slot.name().to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const OFFICE_THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme">
  <a:themeElements>
    <a:clrScheme name="Office">
      <a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>
      <a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>
      <a:dk2><a:srgbClr val="44546A"/></a:dk2>
      <a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>
      <a:accent1><a:srgbClr val="4472C4"/></a:accent1>
      <a:accent2><a:srgbClr val="ED7D31"/></a:accent2>
      <a:accent3><a:srgbClr val="A5A5A5"/></a:accent3>
      <a:accent4><a:srgbClr val="FFC000"/></a:accent4>
      <a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>
      <a:accent6><a:srgbClr val="70AD47"/></a:accent6>
      <a:hlink><a:srgbClr val="0563C1"/></a:hlink>
      <a:folHlink><a:srgbClr val="954F72"/></a:folHlink>
    </a:clrScheme>
    <a:fmtScheme name="Office">
      <a:fillStyleLst><a:solidFill><a:srgbClr val="123456"/></a:solidFill></a:fillStyleLst>
    </a:fmtScheme>
  </a:themeElements>
</a:theme>"#;

    #[test]
    fn parses_all_twelve_slots() {
        let theme = Theme::from_xml(OFFICE_THEME.as_bytes()).unwrap();
        assert_eq!(theme.iter().count(), 12);
        assert_eq!(theme.color(SchemeSlot::Dk1), Some(Rgb::BLACK));
        assert_eq!(theme.color(SchemeSlot::Lt1), Some(Rgb::WHITE));
        assert_eq!(theme.get("accent1"), Some(Rgb::new(0x44, 0x72, 0xC4)));
        assert_eq!(theme.get("folHlink"), Some(Rgb::new(0x95, 0x4F, 0x72)));
    }

    #[test]
    fn colours_outside_the_scheme_are_ignored() {
        let theme = Theme::from_xml(OFFICE_THEME.as_bytes()).unwrap();
        assert!(theme.iter().all(|(_, rgb)| rgb != Rgb::new(0x12, 0x34, 0x56)));
    }

    #[test]
    fn extra_colour_schemes_do_not_override_the_theme() {
        let xml = OFFICE_THEME.replace(
            "</a:theme>",
            r#"<a:extraClrSchemeLst>
    <a:extraClrScheme>
      <a:clrScheme name="Red">
        <a:accent1><a:srgbClr val="FF0000"/></a:accent1>
        <a:lt1><a:sysClr val="window" lastClr="00FF00"/></a:lt1>
      </a:clrScheme>
    </a:extraClrScheme>
  </a:extraClrSchemeLst>
</a:theme>"#,
        );
        let theme = Theme::from_xml(xml.as_bytes()).unwrap();
        assert_eq!(theme.color(SchemeSlot::Accent1), Some(Rgb::new(0x44, 0x72, 0xC4)));
        assert_eq!(theme.color(SchemeSlot::Lt1), Some(Rgb::WHITE));
    }

    #[test]
    fn invalid_slot_colour_is_an_error() {
        let xml = r#"<a:theme xmlns:a="x"><a:themeElements><a:clrScheme><a:accent1><a:srgbClr val="nope"/></a:accent1></a:clrScheme></a:themeElements></a:theme>"#;
        let err = Theme::from_xml(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, ThemeError::InvalidColor { ref slot, .. } if slot == "accent1"));
    }

    #[test]
    fn from_slots_skips_unknown_names() {
        let mut slots = BTreeMap::new();
        slots.insert("accent2".to_string(), Rgb::new(1, 2, 3));
        slots.insert("phClr".to_string(), Rgb::new(9, 9, 9));
        let theme = Theme::from_slots(&slots);
        assert_eq!(theme.iter().collect::<Vec<_>>(), vec![(SchemeSlot::Accent2, Rgb::new(1, 2, 3))]);
    }

    #[test]
    fn reads_theme_from_package() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        let file = File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("ppt/presentation.xml", options).unwrap();
        zip.write_all(b"<p:presentation/>").unwrap();
        zip.start_file("ppt/theme/_rels/theme1.xml.rels", options).unwrap();
        zip.write_all(b"<Relationships/>").unwrap();
        zip.start_file("ppt/theme/theme1.xml", options).unwrap();
        zip.write_all(OFFICE_THEME.as_bytes()).unwrap();
        zip.finish().unwrap();

        let theme = Theme::from_package(&path).unwrap();
        assert_eq!(theme.get("accent6"), Some(Rgb::new(0x70, 0xAD, 0x47)));
    }

    #[test]
    fn package_without_theme_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pptx");
        let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
        zip.start_file("ppt/presentation.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.finish().unwrap();

        assert!(matches!(Theme::from_package(&path), Err(ThemeError::NotFound { .. })));
    }
}
