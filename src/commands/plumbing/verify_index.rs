use crate::areas::repository::Repository;
use crate::artifacts::index::checksum::Verification;
use crate::artifacts::index::encoder::encode;
use colored::Colorize;

impl Repository {
    /// Check the trailing checksum and whether re-encoding reproduces the file
    ///
    /// Fails when the checksum does not match, after printing both digests.
    pub async fn verify_index(&mut self) -> anyhow::Result<()> {
        let index_file = self.index_file().clone();
        let bytes = tokio::task::spawn_blocking(move || index_file.read_bytes()).await??;
        let index = self.index_file().decode_bytes(&bytes, self.options())?;

        let reencoded = encode(&index)?;
        let mut writer = self.writer();

        writeln!(writer, "checksum  {}", index.checksum())?;
        match index.verification() {
            Verification::Verified => writeln!(writer, "status    {}", "ok".green())?,
            Verification::Mismatch { computed, .. } => writeln!(
                writer,
                "status    {} (computed {computed})",
                "mismatch".red()
            )?,
            Verification::Unchecked => writeln!(writer, "status    {}", "unchecked".yellow())?,
        }
        match first_difference(&bytes, &reencoded) {
            None => writeln!(writer, "encoding  identical")?,
            Some(offset) => writeln!(writer, "encoding  differs at byte {offset}")?,
        }

        Ok(index.ensure_verified()?)
    }
}

fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"abc", b"abc", None)]
    #[case(b"abc", b"abd", Some(2))]
    #[case(b"abc", b"abcd", Some(3))]
    #[case(b"", b"x", Some(0))]
    fn first_difference_finds_the_offset(
        #[case] a: &[u8],
        #[case] b: &[u8],
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(first_difference(a, b), expected);
    }
}
