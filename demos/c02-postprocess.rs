use streamdiffx::{ModelQuirks, postprocess_completion};

fn main() {
	let quirks = ModelQuirks::default();
	let prefix = "fn total(items: &[u32]) -> u32 {\n    items.iter().";
	let suffix = "\n}";

	let candidates = [
		("plain accept", "gpt-4o", "sum()"),
		("blank reject", "gpt-4o", "   \n\t"),
		("echoed line reject", "gpt-4o", "    items.iter().\n    sum()"),
	];

	for (label, model_id, completion) in candidates {
		match postprocess_completion(completion, model_id, prefix, suffix, &quirks) {
			Some(cleaned) => println!("{label:>20}: accepted {cleaned:?}"),
			None => println!("{label:>20}: rejected"),
		}
	}
}
