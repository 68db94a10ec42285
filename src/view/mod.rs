use crate::environ::Environ;
use crate::exception::HttpException;

/// The fallback view invoked when an exception reaches the top of the
/// request pipeline.
///
/// When `context` already is an exception response it is returned unchanged;
/// otherwise the exception attached to the request environ is taken. The
/// raised exception value wins over whatever object triggered view lookup.
///
/// # Panics
///
/// Panics when neither source carries an exception value. Callers invoke
/// this only for requests that raised one; anything else is a bug in the
/// routing layer, not a condition to handle.
pub fn default_exception_view(context: Option<HttpException>, request: &mut Environ) -> HttpException {
    context
        .or_else(|| request.take_exception())
        .expect("request reached the exception view without an attached exception")
}
