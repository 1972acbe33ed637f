/// Fail the current action and return from the entry point.
///
/// ```rust,ignore
/// fn call(&mut self) -> Flow<()> {
///     if self.input.amount == 0 {
///         fail!(self, "error" => "nothing to charge", "code" => 400);
///     }
///     // not reached on failure
///     Ok(())
/// }
/// ```
///
/// Also accepts anything implementing `IntoFields` (`fail!(self, fields)`),
/// or no fields at all (`fail!(self)`).
#[macro_export]
macro_rules! fail {
    ($action:expr, $($key:literal => $value:expr),+ $(,)?) => {{
        use $crate::Action as _;
        return $action.fail([
            $(($key, $crate::__private::serde_json::json!($value))),+
        ]);
    }};
    ($action:expr, $fields:expr $(,)?) => {{
        use $crate::Action as _;
        return $action.fail($fields);
    }};
    ($action:expr) => {{
        use $crate::Action as _;
        return $action.fail(());
    }};
}
