/// Marker for the type-state parameters of builders.
///
/// Builders encode which required fields were provided in their type, so
/// `build` only exists once every required piece is set.
pub trait BuilderTypeState {}
