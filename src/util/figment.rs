use error_stack::{Context, Report};

/// Spreads a [`figment::Error`] over report attachments so the
/// offending key and its source show up when loading fails.
pub trait FigmentErrorAttachable<T: Context> {
    fn attach_figment_error(self, err: figment::Error) -> Report<T>;
}

impl<T: Context> FigmentErrorAttachable<T> for Report<T> {
    fn attach_figment_error(self, error: figment::Error) -> Report<T> {
        let mut report = self;
        for error in error {
            report = report.attach_printable(error.kind.to_string());

            if let (Some(profile), Some(metadata)) = (&error.profile, &error.metadata) {
                if !error.path.is_empty() {
                    let key = metadata.interpolate(profile, &error.path);
                    report = report.attach_printable(format!("for key {key:?}"));
                }
            }

            if let Some(metadata) = &error.metadata {
                report = match &metadata.source {
                    Some(source) => {
                        report.attach_printable(format!("in {source} {}", metadata.name))
                    }
                    None => report.attach_printable(format!("in {}", metadata.name)),
                };
            }
        }
        report
    }
}
