//! Business status carried on response values.
//!
//! Response messages report business outcomes through one of a few
//! conventional fields. [`ResponseStatus`] is the ordered capability set the
//! status resolver probes; a message type implements only the accessor it
//! actually has and inherits `None` for the rest.
//!
//! ```rust
//! use flowlog_domain::response::{probe_status_code, ResponseStatus};
//!
//! struct GetUserReply {
//!     retcode: i32,
//! }
//!
//! impl ResponseStatus for GetUserReply {
//!     fn retcode(&self) -> Option<i32> {
//!         Some(self.retcode)
//!     }
//! }
//!
//! assert_eq!(probe_status_code(&GetUserReply { retcode: 3 }), Some(3));
//! ```

/// Optional business status accessors, probed in declaration order.
pub trait ResponseStatus {
    /// `retcode` field
    fn retcode(&self) -> Option<i32> {
        None
    }

    /// `ret_code` / `retCode` field
    fn ret_code(&self) -> Option<i32> {
        None
    }

    /// `code` field
    fn code(&self) -> Option<i32> {
        None
    }
}

/// Probe the capability set in priority order; first match wins.
pub fn probe_status_code<R: ResponseStatus + ?Sized>(response: &R) -> Option<i32> {
    response
        .retcode()
        .or_else(|| response.ret_code())
        .or_else(|| response.code())
}

impl ResponseStatus for () {}

impl ResponseStatus for String {}

impl ResponseStatus for str {}

impl<T: ResponseStatus + ?Sized> ResponseStatus for &T {
    fn retcode(&self) -> Option<i32> {
        (**self).retcode()
    }

    fn ret_code(&self) -> Option<i32> {
        (**self).ret_code()
    }

    fn code(&self) -> Option<i32> {
        (**self).code()
    }
}

impl<T: ResponseStatus + ?Sized> ResponseStatus for Box<T> {
    fn retcode(&self) -> Option<i32> {
        (**self).retcode()
    }

    fn ret_code(&self) -> Option<i32> {
        (**self).ret_code()
    }

    fn code(&self) -> Option<i32> {
        (**self).code()
    }
}

impl<T: ResponseStatus> ResponseStatus for Option<T> {
    fn retcode(&self) -> Option<i32> {
        self.as_ref().and_then(ResponseStatus::retcode)
    }

    fn ret_code(&self) -> Option<i32> {
        self.as_ref().and_then(ResponseStatus::ret_code)
    }

    fn code(&self) -> Option<i32> {
        self.as_ref().and_then(ResponseStatus::code)
    }
}

/// Dynamic JSON responses are probed by key.
impl ResponseStatus for serde_json::Value {
    fn retcode(&self) -> Option<i32> {
        json_i32(self, &["retcode"])
    }

    fn ret_code(&self) -> Option<i32> {
        json_i32(self, &["retCode", "ret_code"])
    }

    fn code(&self) -> Option<i32> {
        json_i32(self, &["code"])
    }
}

fn json_i32(value: &serde_json::Value, keys: &[&str]) -> Option<i32> {
    let object = value.as_object()?;
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find_map(|v| v.as_i64())
        .and_then(|v| i32::try_from(v).ok())
}
