//! # 错误处理宏

/// 快速创建配置错误的宏
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::QmsError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::QmsError::config(format!($fmt, $($arg)*))
    };
}

/// 快速创建数据库错误的宏
#[macro_export]
macro_rules! database_error {
    ($msg:expr) => {
        $crate::error::QmsError::database($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::QmsError::database(format!($fmt, $($arg)*))
    };
}

/// 快速创建校验错误的宏，可选地带上字段名
#[macro_export]
macro_rules! validation_error {
    (field = $field:expr, $msg:expr) => {
        $crate::error::QmsError::validation_field($field, $msg)
    };
    (field = $field:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::error::QmsError::validation_field($field, format!($fmt, $($arg)*))
    };
    ($msg:expr) => {
        $crate::error::QmsError::validation($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::QmsError::validation(format!($fmt, $($arg)*))
    };
}

/// 确保条件成立，否则返回配置错误
#[macro_export]
macro_rules! ensure_config {
    ($cond:expr, $msg:expr) => {
        if !($cond) {
            return Err($crate::config_error!($msg));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !($cond) {
            return Err($crate::config_error!($fmt, $($arg)*));
        }
    };
}

/// 确保条件成立，否则返回校验错误
#[macro_export]
macro_rules! ensure_valid {
    ($cond:expr, field = $field:expr, $msg:expr) => {
        if !($cond) {
            return Err($crate::validation_error!(field = $field, $msg));
        }
    };
    ($cond:expr, $msg:expr) => {
        if !($cond) {
            return Err($crate::validation_error!($msg));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !($cond) {
            return Err($crate::validation_error!($fmt, $($arg)*));
        }
    };
}
