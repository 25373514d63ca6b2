use std::io::Write;
use std::path::Path;

use color_print::cprintln;

use vsasm::{assemble, dump_text, entries_text, externs_text, object_text, Error};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about,help_template = HELP_TEMPLATE)]
struct Args {
    /// Input files
    #[clap(default_value = "main.as")]
    input: Vec<String>,

    /// Output directory
    #[clap(short, long, default_value = "outputs")]
    out_dir: String,

    /// Dump the encoded image and symbols
    #[clap(short, long)]
    dump: bool,
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    println!("VS24 Assembler");

    let mut failed = false;
    for path in &args.input {
        match process(path, &args) {
            Ok(clean) => failed |= !clean,
            Err(err) => {
                cprintln!("<red,bold>error</>: {}", err);
                failed = true;
            }
        }
    }
    if failed {
        std::process::exit(1);
    }
}

/// Assemble one file and write its artifacts. `Ok(false)` means the file
/// was read but had assembly errors, so only the `.am` was written.
fn process(path: &str, args: &Args) -> Result<bool, Error> {
    // 1. Read and assemble in memory
    println!("  < {}", path);
    let source =
        std::fs::read_to_string(path).map_err(|err| Error::FileOpen(path.to_string(), err))?;

    let out = assemble(&source, path);

    // 2. The expanded source is written even when assembly failed
    std::fs::create_dir_all(&args.out_dir)
        .map_err(|err| Error::FileCreate(args.out_dir.clone(), err))?;
    let base = Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());

    let am_path = format!("{}/{}.am", args.out_dir, base);
    println!("  > {}", am_path);
    write_file(&am_path, &out.am)?;

    let Some(image) = &out.image else {
        cprintln!(
            "<red,bold>{} error(s)</>, object files skipped: {}",
            out.diags.count(),
            path
        );
        return Ok(false);
    };

    // 3. Object artifacts, clean runs only
    let ob_path = format!("{}/{}.ob", args.out_dir, base);
    println!("  > {}", ob_path);
    write_file(&ob_path, &object_text(image))?;

    if out.symbols.has_entries() {
        let ent_path = format!("{}/{}.ent", args.out_dir, base);
        println!("  > {}", ent_path);
        write_file(&ent_path, &entries_text(&out.symbols))?;
    }
    if out.symbols.extern_use_count() > 0 {
        let ext_path = format!("{}/{}.ext", args.out_dir, base);
        println!("  > {}", ext_path);
        write_file(&ext_path, &externs_text(&out.symbols))?;
    }

    if args.dump {
        print!("{}", dump_text(image, &out.symbols));
    }
    Ok(true)
}

fn write_file(path: &str, text: &str) -> Result<(), Error> {
    let mut file =
        std::fs::File::create(path).map_err(|err| Error::FileCreate(path.to_string(), err))?;
    file.write_all(text.as_bytes())
        .map_err(|err| Error::FileWrite(path.to_string(), err))
}
