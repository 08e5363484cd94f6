use crate::areas::repository::Repository;

impl Repository {
    /// List index entries in file order
    ///
    /// With `stage`, each line matches `git ls-files --stage`:
    /// `<mode> <oid> <stage>\t<path>`.
    pub async fn ls_files(&mut self, stage: bool) -> anyhow::Result<()> {
        let index = self.load_index().await?;
        let mut writer = self.writer();

        for entry in index.entries() {
            if stage {
                writeln!(
                    writer,
                    "{} {} {}\t{}",
                    entry.metadata.mode,
                    entry.oid,
                    entry.stage(),
                    entry.path().display()
                )?;
            } else {
                writeln!(writer, "{}", entry.path().display())?;
            }
        }

        Ok(())
    }
}
