use heck::ToUpperCamelCase;

/// Translate an input key to the declared PascalCase field convention.
///
/// Accepts `snake_case`, `kebab-case`, `camelCase`, and `PascalCase` input,
/// so `livesIn`, `lives_in`, and `LivesIn` all map to `LivesIn` while an
/// unsegmented `ptrname` stays `Ptrname`.
pub(crate) fn to_pascal(input: &str) -> String {
	input.to_upper_camel_case()
}
