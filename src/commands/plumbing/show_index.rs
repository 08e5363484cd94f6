use crate::areas::repository::Repository;
use crate::artifacts::index::entry_flags::ExtendedFlags;
use crate::artifacts::index::index_entry::IndexEntry;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Print the header, then every field of every entry
    pub async fn show_index(&mut self) -> anyhow::Result<()> {
        let index = self.load_index().await?;
        let header = index.header();
        let mut writer = self.writer();

        writeln!(writer, "{}", "header".bold())?;
        writeln!(
            writer,
            "  signature    {}",
            String::from_utf8_lossy(&header.signature)
        )?;
        writeln!(writer, "  version      {}", header.version)?;
        writeln!(writer, "  entries      {}", header.entry_count)?;

        for (position, entry) in index.entries().iter().enumerate() {
            writeln!(writer)?;
            show_entry(&mut *writer, position, entry)?;
        }

        writeln!(writer)?;
        writeln!(writer, "{}", "trailer".bold())?;
        writeln!(writer, "  checksum     {}", index.checksum())?;
        writeln!(
            writer,
            "  verified     {}",
            if index.verified() { "yes" } else { "no" }
        )?;

        Ok(())
    }
}

fn show_entry(writer: &mut dyn Write, position: usize, entry: &IndexEntry) -> anyhow::Result<()> {
    let metadata = &entry.metadata;

    writeln!(
        writer,
        "{}",
        format!("entry {position}: {}", entry.path().display()).bold()
    )?;
    writeln!(
        writer,
        "  ctime        {}",
        format_timestamp(metadata.ctime, metadata.ctime_nsec)
    )?;
    writeln!(
        writer,
        "  mtime        {}",
        format_timestamp(metadata.mtime, metadata.mtime_nsec)
    )?;
    writeln!(writer, "  dev          {}", metadata.dev)?;
    writeln!(writer, "  ino          {}", metadata.ino)?;
    writeln!(
        writer,
        "  mode         {} ({}{})",
        metadata.mode,
        metadata.mode.object_type().as_str(),
        if metadata.mode.is_executable() { ", executable" } else { "" }
    )?;
    writeln!(writer, "  uid          {}", metadata.uid)?;
    writeln!(writer, "  gid          {}", metadata.gid)?;
    writeln!(writer, "  size         {}", metadata.size)?;
    writeln!(writer, "  oid          {}", entry.oid)?;
    writeln!(writer, "  stage        {}", entry.stage())?;
    writeln!(writer, "  name length  {}", entry.flags.name_length())?;
    writeln!(writer, "  flags        {}", describe_flags(entry))?;

    Ok(())
}

fn describe_flags(entry: &IndexEntry) -> String {
    let mut names = Vec::new();

    if entry.flags.is_assume_valid() {
        names.push("assume-valid");
    }
    if let Some(extended) = entry.extended_flags {
        names.push("extended");
        if extended.contains(ExtendedFlags::SKIP_WORKTREE) {
            names.push("skip-worktree");
        }
        if extended.contains(ExtendedFlags::INTENT_TO_ADD) {
            names.push("intent-to-add");
        }
    }

    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

/// Seconds and nanoseconds since the epoch, rendered in UTC
fn format_timestamp(seconds: u32, nanoseconds: u32) -> String {
    match chrono::DateTime::from_timestamp(i64::from(seconds), nanoseconds) {
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S%.9f UTC").to_string(),
        None => format!("{seconds}.{nanoseconds:09}"),
    }
}
