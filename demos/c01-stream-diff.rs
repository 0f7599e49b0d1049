use futures::StreamExt;
use streamdiffx::diff_lines;
use streamdiffx::test_support::{lines_stream, to_lines};

type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>;

fn main() -> Result<()> {
	let old_lines = to_lines(&[
		"fn main() {",
		"    let x = 1;",
		"    println!(\"{x}\");",
		"}",
	]);

	// Stands in for the model response stream.
	let new_lines = lines_stream(&[
		"fn main() {",
		"    let x = 1;",
		"    let y = 2;",
		"    println!(\"{x} {y}\");",
		"}",
	]);

	let mut diff_stream = Box::pin(diff_lines(old_lines, new_lines));

	futures::executor::block_on(async {
		while let Some(diff_line) = diff_stream.next().await {
			println!("{diff_line}");
		}
	});

	Ok(())
}
