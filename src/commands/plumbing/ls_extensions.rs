use crate::areas::repository::Repository;
use crate::artifacts::index::extensions::split_index::EwahBitmap;
use crate::artifacts::index::extensions::{ExtensionBlock, ExtensionData};
use colored::Colorize;

impl Repository {
    /// List extension blocks in file order
    ///
    /// Each block gets a line with its signature, payload size and name, then
    /// an indented summary when its payload was understood.
    pub async fn ls_extensions(&mut self) -> anyhow::Result<()> {
        let index = self.load_index().await?;
        let mut writer = self.writer();

        for block in index.extensions() {
            writeln!(
                writer,
                "{} {:>10} bytes  {}",
                block.signature_str().yellow(),
                block.length(),
                block.description().unwrap_or("unknown")
            )?;
            for line in summarize(block) {
                writeln!(writer, "    {line}")?;
            }
        }

        Ok(())
    }
}

fn summarize(block: &ExtensionBlock) -> Vec<String> {
    match &block.data {
        ExtensionData::CacheTree(tree) => {
            let invalid = tree.nodes.iter().filter(|node| !node.is_valid()).count();
            let mut lines = vec![format!("{} nodes, {invalid} invalidated", tree.nodes.len())];
            if let Some(root) = tree.root() {
                match root.oid {
                    Some(oid) => lines.push(format!(
                        "root {} covers {} entries",
                        oid.to_short_oid(),
                        root.entry_count
                    )),
                    None => lines.push("root invalidated".to_string()),
                }
            }
            lines
        }
        ExtensionData::ResolveUndo(undo) => undo
            .entries
            .iter()
            .map(|entry| {
                let stages = entry
                    .stages
                    .iter()
                    .map(|stage| match stage {
                        Some((mode, oid)) => format!("{mode} {}", oid.to_short_oid()),
                        None => "-".to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join("  ");
                format!("{}  {stages}", entry.path.display())
            })
            .collect(),
        ExtensionData::SplitIndex(split) => vec![
            format!("base {}", split.base_oid),
            format!("delete {}", describe_bitmap(split.delete_bitmap.as_ref())),
            format!("replace {}", describe_bitmap(split.replace_bitmap.as_ref())),
        ],
        ExtensionData::EndOfEntries(eoie) => vec![format!("entries end at byte {}", eoie.offset)],
        ExtensionData::Opaque if block.description().is_some() => {
            vec!["payload not decoded".to_string()]
        }
        ExtensionData::Opaque => Vec::new(),
    }
}

fn describe_bitmap(bitmap: Option<&EwahBitmap>) -> String {
    match bitmap {
        Some(bitmap) => format!("{} bits in {} words", bitmap.bit_size, bitmap.words.len()),
        None => "none".to_string(),
    }
}
