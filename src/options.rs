/// Options forwarded to the schema engine for every validation unit.
///
/// - `coerce` permits type conversion during validation (numeric strings to
///   numbers, defaults filled in for absent values). Default: `true`.
/// - `mask` strips unknown object keys instead of rejecting them.
///   Default: `false`.
///
/// # Examples
///
/// ```
/// use request_validator::ValidateOptions;
///
/// let options = ValidateOptions::default();
/// assert!(options.coerce);
/// assert!(!options.mask);
///
/// let strict = ValidateOptions::default().with_coerce(false).with_mask(true);
/// assert!(!strict.coerce);
/// assert!(strict.mask);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Allow the schema to convert values to its target type
    pub coerce: bool,
    /// Strip unknown object keys instead of failing on them
    pub mask: bool,
}

impl ValidateOptions {
    /// Sets whether coercion is applied.
    pub fn with_coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }

    /// Sets whether unknown object keys are stripped.
    pub fn with_mask(mut self, mask: bool) -> Self {
        self.mask = mask;
        self
    }
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            coerce: true,
            mask: false,
        }
    }
}
