//! Integration tests for the completion postprocessor gates and corrections.

type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>; // For tests.

use assertables::assert_starts_with;
use streamdiffx::{ModelQuirks, postprocess_completion};

const PLAIN_MODEL: &str = "gpt-4o-mini";
const LEADING_SPACE_MODEL: &str = "mistral/Codestral-latest";
const PREFIX_ECHO_MODEL: &str = "ibm/granite-8b-code";

fn quirks() -> ModelQuirks {
	ModelQuirks::default()
}

// region:    --- Reject Gates

#[test]
fn test_postprocess_rejects_empty() -> Result<()> {
	// -- Exec
	let res = postprocess_completion("", PLAIN_MODEL, "let x = ", "\n", &quirks());

	// -- Check
	assert_eq!(res, None);

	Ok(())
}

#[test]
fn test_postprocess_rejects_whitespace_only() -> Result<()> {
	// -- Exec
	let res = postprocess_completion("   \n\t", PLAIN_MODEL, "let x = ", "\n", &quirks());

	// -- Check
	assert_eq!(res, None);

	Ok(())
}

#[test]
fn test_postprocess_rejects_repeat_of_line_above() -> Result<()> {
	// -- Setup & Fixtures
	let prefix = "fn compute() {\n    let total = sum(values);\n";
	// Same line, renormalized whitespace and case.
	let completion = "LET  TOTAL = SUM(VALUES);\n    total";

	// -- Exec
	let res = postprocess_completion(completion, PLAIN_MODEL, prefix, "\n}", &quirks());

	// -- Check
	assert_eq!(res, None, "Echo of the line above should be rejected");

	Ok(())
}

#[test]
fn test_postprocess_rejects_repetition_loop() -> Result<()> {
	// -- Setup & Fixtures
	// Every 2nd line repeats a long shared run with line 0, with drift.
	let completion = [
		"items.push(compute_entry(0));",
		"// entry 0",
		"items.push(compute_entry(1));",
		"// entry 1",
		"items.push(compute_entry(2));",
		"// entry 2",
		"items.push(compute_entry(3));",
		"// entry 3",
		"items.push(compute_entry(4));",
		"// entry 4",
	]
	.join("\n");

	// -- Exec
	let res = postprocess_completion(&completion, PLAIN_MODEL, "fn fill() {\n", "\n}", &quirks());

	// -- Check
	assert_eq!(res, None, "Repetition loop should be rejected");

	Ok(())
}

#[test]
fn test_postprocess_accepts_normal_completion() -> Result<()> {
	// -- Setup & Fixtures
	let prefix = "fn add(a: i32, b: i32) -> i32 {\n";
	let completion = "    a + b\n}";

	// -- Exec
	let res = postprocess_completion(completion, PLAIN_MODEL, prefix, "\n", &quirks());

	// -- Check
	assert_eq!(res.as_deref(), Some(completion));

	Ok(())
}

// endregion: --- Reject Gates

// region:    --- Corrections

#[test]
fn test_postprocess_universal_seam_space_strip() -> Result<()> {
	// -- Setup & Fixtures
	let prefix = "let name = ";
	let completion = " value.to_string();";

	// -- Exec
	let res = postprocess_completion(completion, PLAIN_MODEL, prefix, "", &quirks());

	// -- Check
	assert_eq!(res.as_deref(), Some("value.to_string();"));

	Ok(())
}

#[test]
fn test_postprocess_leading_space_quirk_mid_line() -> Result<()> {
	// -- Setup & Fixtures
	// One extra space (not two) at a mid-line cursor with a newline ahead.
	let prefix = "result = ";
	let completion = " compute(input)";
	let suffix = "\nprint(result)";

	// -- Exec
	let res = postprocess_completion(completion, LEADING_SPACE_MODEL, prefix, suffix, &quirks());

	// -- Check
	assert_eq!(res.as_deref(), Some("compute(input)"));

	Ok(())
}

#[test]
fn test_postprocess_leading_space_quirk_not_for_plain_model() -> Result<()> {
	// -- Setup & Fixtures
	let prefix = "result =";
	let completion = " compute(input)";
	let suffix = "\nprint(result)";

	// -- Exec
	// Prefix does not end with a space, so the universal fixup does not fire
	// either; a non-marked model keeps the completion untouched.
	let res = postprocess_completion(completion, PLAIN_MODEL, prefix, suffix, &quirks());

	// -- Check
	assert_eq!(res.as_deref(), Some(" compute(input)"));

	Ok(())
}

#[test]
fn test_postprocess_leading_space_quirk_double_blank_line() -> Result<()> {
	// -- Setup & Fixtures
	let prefix = "fn main() {}\n\n";
	let completion = "\nfn helper() {}";

	// -- Exec
	let res = postprocess_completion(completion, LEADING_SPACE_MODEL, prefix, "", &quirks());

	// -- Check
	assert_eq!(res.as_deref(), Some("fn helper() {}"));

	Ok(())
}

#[test]
fn test_postprocess_prefix_echo_full_line() -> Result<()> {
	// -- Setup & Fixtures
	let prefix = "const count = ";
	let completion = "const count = items.length;";

	// -- Exec
	let res = postprocess_completion(completion, PREFIX_ECHO_MODEL, prefix, "\n", &quirks());

	// -- Check
	assert_eq!(res.as_deref(), Some("items.length;"));

	Ok(())
}

#[test]
fn test_postprocess_prefix_echo_last_word() -> Result<()> {
	// -- Setup & Fixtures
	let prefix = "let total = base";
	let completion = "base + extra;";

	// -- Exec
	let res = postprocess_completion(completion, PREFIX_ECHO_MODEL, prefix, "\n", &quirks());

	// -- Check
	assert_eq!(res.as_deref(), Some(" + extra;"));

	Ok(())
}

#[test]
fn test_postprocess_prefix_echo_new_line_intent() -> Result<()> {
	// -- Setup & Fixtures
	// Indented start while the cursor sits at the end of a line.
	let prefix = "fn run() {";
	let completion = "    do_work();";
	let suffix = "\n}";

	// -- Exec
	let res = postprocess_completion(completion, PREFIX_ECHO_MODEL, prefix, suffix, &quirks());

	// -- Check
	let res = res.ok_or("Should not be rejected")?;
	assert_starts_with!(res, "\n");
	assert_eq!(res, "\n    do_work();");

	Ok(())
}

#[test]
fn test_postprocess_custom_quirk_markers() -> Result<()> {
	// -- Setup & Fixtures
	let quirks = ModelQuirks::new(vec!["MyModel".to_string()], Vec::new())?;
	let prefix = "value = ";
	let completion = " 42";
	let suffix = "\n";

	// -- Exec
	let res = postprocess_completion(completion, "acme/mymodel-2", prefix, suffix, &quirks);

	// -- Check
	// Marker match is a case-insensitive substring.
	assert_eq!(res.as_deref(), Some("42"));

	Ok(())
}

// endregion: --- Corrections
