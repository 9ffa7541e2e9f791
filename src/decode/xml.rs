//! Query record XML decoder
//!
//! Streams the document with quick-xml; only the root and its direct
//! children matter, deeper elements are skipped.

use super::types::{QueryLink, QueryPage};
use crate::error::{Error, Result};
use crate::record::Record;
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Element name of pagination links
const LINK_ELEMENT: &str = "Link";

/// Decoder for `QueryResultRecords` documents
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryRecordsDecoder;

impl QueryRecordsDecoder {
    /// Create a decoder that treats every non-link child as a record
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a response body
    pub fn decode(self, body: &str) -> Result<QueryPage> {
        let body = body.trim();
        if !body.starts_with('<') {
            return Err(Error::xml("Input does not appear to be XML"));
        }

        let mut reader = Reader::from_str(body);
        reader.config_mut().trim_text(true);

        let mut page = QueryPage::default();
        let mut depth = 0usize;

        loop {
            let event = reader.read_event().map_err(|e| {
                Error::xml(format!("at byte {}: {e}", reader.buffer_position()))
            })?;

            match event {
                Event::Start(ref e) => {
                    self.visit(e, depth, &mut page, reader.decoder())?;
                    depth += 1;
                }
                Event::Empty(ref e) => {
                    self.visit(e, depth, &mut page, reader.decoder())?;
                }
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if page.root.is_empty() {
            return Err(Error::xml("Document has no root element"));
        }

        Ok(page)
    }

    fn visit(
        self,
        element: &BytesStart<'_>,
        depth: usize,
        page: &mut QueryPage,
        decoder: Decoder,
    ) -> Result<()> {
        let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();

        match depth {
            0 => {
                for (key, value) in read_attributes(element, decoder)? {
                    match key.as_str() {
                        "total" => page.total = value.parse().ok(),
                        "pageSize" => page.page_size = value.parse().ok(),
                        "page" => page.page = value.parse().ok(),
                        _ => {}
                    }
                }
                page.root = name;
            }
            1 if name == LINK_ELEMENT => {
                let mut link = QueryLink::default();
                for (key, value) in read_attributes(element, decoder)? {
                    match key.as_str() {
                        "rel" => link.rel = value,
                        "href" => link.href = value,
                        "type" => link.media_type = Some(value),
                        _ => {}
                    }
                }
                page.links.push(link);
            }
            1 => {
                let record: Record = read_attributes(element, decoder)?.into_iter().collect();
                page.records.push(record);
            }
            _ => {}
        }

        Ok(())
    }
}

/// Read the attributes of an element, skipping namespace declarations
fn read_attributes(element: &BytesStart<'_>, decoder: Decoder) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();

    for attr in element.attributes() {
        let attr = attr.map_err(|e| Error::xml(format!("Malformed attribute: {e}")))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        if key == "xmlns" || key.starts_with("xmlns:") || key.starts_with("xsi:") {
            continue;
        }

        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(|e| Error::xml(format!("Bad value for attribute '{key}': {e}")))?
            .into_owned();
        out.push((key, value));
    }

    Ok(out)
}
