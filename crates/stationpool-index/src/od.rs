/// An ordered pair of station ids identifying a request's endpoints.
pub type OdPair = (i64, i64);
