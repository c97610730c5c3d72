/// Writes a rendered scene to a terminal or any other writer
use crossterm::{style::Print, QueueableCommand};
use std::io::Write;
use stltext_core::Scene;

/// Queue every row of the scene, top to bottom, each ending in a newline
pub fn draw<W: Write>(scene: &Scene, writer: &mut W) -> std::io::Result<()> {
    for row in scene.rows() {
        let line: String = row.iter().map(|cell| cell.glyph).collect();
        writer.queue(Print(line))?;
        writer.queue(Print('\n'))?;
    }
    writer.flush()
}
