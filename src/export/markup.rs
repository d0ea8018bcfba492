//! Structured markup rendering of configuration snapshots
//!
//! Emits a compact document with no declaration:
//! `<network_config><device><name>..</name><ip>..</ip><type>..</type></device></network_config>`

use crate::device::ConfigSnapshot;
use crate::error::{NetFleetError, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

/// Root element name
pub const ROOT_ELEMENT: &str = "network_config";

/// Per-device element name
pub const DEVICE_ELEMENT: &str = "device";

fn write(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| NetFleetError::Serialization(e.to_string()))
}

/// Render snapshots as a markup document
pub fn render_markup(snapshots: &[ConfigSnapshot]) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    if snapshots.is_empty() {
        write(&mut writer, Event::Empty(BytesStart::new(ROOT_ELEMENT)))?;
    } else {
        write(&mut writer, Event::Start(BytesStart::new(ROOT_ELEMENT)))?;
        for snapshot in snapshots {
            write(&mut writer, Event::Start(BytesStart::new(DEVICE_ELEMENT)))?;
            for (key, value) in snapshot.fields() {
                write(&mut writer, Event::Start(BytesStart::new(key)))?;
                write(&mut writer, Event::Text(BytesText::new(value)))?;
                write(&mut writer, Event::End(BytesEnd::new(key)))?;
            }
            write(&mut writer, Event::End(BytesEnd::new(DEVICE_ELEMENT)))?;
        }
        write(&mut writer, Event::End(BytesEnd::new(ROOT_ELEMENT)))?;
    }

    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| NetFleetError::Serialization(e.to_string()))
}
