use crate::{
    AnswerValue, ConfirmPrompt, GroupSession, Prelude, SessionError, SessionStyle, SummarySection,
    ValidationFailure,
};

/// Trait for backend implementations that present survey groups to an operator.
///
/// Backends receive one `GroupSession` at a time and return the values the
/// operator settled on, one slot per field in session order. Fields are
/// identified by position, not key, since a key may repeat. Backends decide
/// how to present the fields and handle validation internally in retry loops.
pub trait SurveyBackend {
    /// The error type for this backend.
    type Error: Into<SessionError>;

    /// Show the message that introduces the survey.
    ///
    /// The default implementation shows nothing.
    fn prelude(&self, _prelude: &Prelude, _style: &SessionStyle) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Collect values for every non-note field of a group.
    ///
    /// # Arguments
    /// * `session` - The group, with all defaults resolved
    /// * `validate` - The rule of the field at the given index of
    ///   `session.fields`. Values failing it must be asked again.
    ///
    /// # Returns
    /// * `Ok(values)` with `values[i]` for `session.fields[i]`: `Some` for
    ///   every non-note field, `None` for notes
    /// * `Err` on cancellation or backend failure
    fn collect_group(
        &self,
        session: &GroupSession,
        validate: &dyn Fn(usize, &AnswerValue) -> Result<(), ValidationFailure>,
    ) -> Result<Vec<Option<AnswerValue>>, Self::Error>;

    /// Show the collected answers, group by group.
    ///
    /// The default implementation shows nothing.
    fn summarize(
        &self,
        _sections: &[SummarySection<'_>],
        _style: &SessionStyle,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Ask the final yes/no question before answers are written.
    fn confirm(&self, prompt: &ConfirmPrompt, style: &SessionStyle) -> Result<bool, Self::Error>;
}
