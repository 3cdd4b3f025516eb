/// Unwraps an `Ok`, panicking with the error's full context otherwise.
#[macro_export]
macro_rules! assert_ok {
    ($e:expr) => {
        match $e {
            Ok(value) => value,
            Err(err) => panic!("expected `Ok`, got error: {err}"),
        }
    };
}

/// Unwraps an `Err`, panicking with the value otherwise.
#[macro_export]
macro_rules! assert_err {
    ($e:expr) => {
        match $e {
            Ok(value) => panic!("expected an error, got `{value:?}`"),
            Err(err) => err,
        }
    };
    ($e:expr, $pred:ident) => {{
        let err = $crate::assert_err!($e);
        assert!(err.$pred(), "unexpected error: {err}");
        err
    }};
}
