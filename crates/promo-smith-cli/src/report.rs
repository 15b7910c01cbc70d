use core::fmt;
use promo_smith::BatchReport;

/// Human readable batch report: a header, the counts, then one line per
/// user.
pub struct Summary<'a> {
    report: &'a BatchReport,
    notes: Option<&'a str>,
}

impl<'a> Summary<'a> {
    pub const fn new(report: &'a BatchReport, notes: Option<&'a str>) -> Self {
        Self { report, notes }
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Promo codes ({})", self.report.scheme())?;
        if let Some(notes) = self.notes {
            writeln!(f, "Notes: {notes}")?;
        }
        writeln!(
            f,
            "Processed: {} · Errors: {}",
            self.report.processed_count(),
            self.report.error_count()
        )?;
        for result in self.report.results() {
            writeln!(f, "{result}")?;
        }
        Ok(())
    }
}
