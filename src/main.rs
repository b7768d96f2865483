use clap::{arg, crate_version, Arg, ArgAction, Command};
use dnacodex::pipeline::PayloadKind;
use dnacodex::{pipeline, report, simulate};

const RCH: &str = "unreachable was reached";

fn timestamp() -> String {
    chrono::Local::now().format("%Y%m%d%H%M%S").to_string()
}

fn huffman_flag(help: &'static str) -> Arg {
    Arg::new("huffman")
        .long("huffman")
        .visible_alias("Huffman")
        .action(ArgAction::SetTrue)
        .help(help)
}

fn encode_suffix(file_type: &str) -> String {
    if file_type == "txt" {
        "_text.txt".to_string()
    } else {
        format!("_{}.txt", file_type)
    }
}

fn run_encode(cmd: &clap::ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let file_name = cmd.get_one::<String>("file_name").expect(RCH);
    let file_type = cmd.get_one::<String>("type").expect(RCH);
    let output_base = cmd.get_one::<String>("output_filename").expect(RCH);
    let huffman_on = cmd.get_flag("huffman");

    let kind = PayloadKind::from_type_str(file_type)?;
    let input = std::fs::read(file_name)?;
    log::info!("encoding {} ({} bytes, huffman={})", file_name, input.len(), huffman_on);

    let outcome = pipeline::encode(&input, kind, huffman_on)?;

    let output_filename = format!("{}{}", output_base, encode_suffix(file_type));
    std::fs::write(&output_filename, &outcome.dna)?;

    println!("# File Name: {}", file_name);
    println!("# File Format: {}", file_type);
    println!("# Huffman: {}", huffman_on);
    if let (Some(payload_bits), Some(dict_bits)) = (outcome.huffman_payload_bits, outcome.dictionary_bits) {
        println!("> Huffman compression was applied");
        println!("> Space usage before Huffman compression: {} bits", input.len() * 8);
        println!("> Space usage after Huffman compression (payload): {} bits", payload_bits);
        println!("> Dictionary size: {} bits", dict_bits);
        println!(
            "> Space usage after Huffman compression (payload + header + dictionary): {} bits",
            outcome.raw_bits
        );
    } else {
        println!("> Huffman compression was NOT applied");
    }
    println!("> Full length of the sequence: {} DNA bases", outcome.dna.chars().count());
    println!("> DNA encoded data was saved in the file: {}", output_filename);

    Ok(())
}

fn run_decode(cmd: &clap::ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let file_name = cmd.get_one::<String>("file_name").expect(RCH);
    let file_type = cmd.get_one::<String>("type").expect(RCH);
    let output_base = cmd.get_one::<String>("output_filename").expect(RCH);
    let huffman_on = cmd.get_flag("huffman");

    let kind = PayloadKind::from_type_str(file_type)?;
    let dna = std::fs::read_to_string(file_name)?;
    let dna = dna.trim();
    log::info!("decoding {} ({} bases, huffman={})", file_name, dna.chars().count(), huffman_on);

    let outcome = pipeline::decode(dna, kind, huffman_on)?;

    let output_filename = format!("{}.{}", output_base, file_type);
    std::fs::write(&output_filename, &outcome.bytes)?;

    if outcome.report.errors_corrected > 0 {
        let seqs_path = format!("DNAcodeX_corrected_seqs_{}.csv", timestamp());
        report::write_corrected_sequences(
            std::path::Path::new(&seqs_path),
            dna,
            &outcome.report.corrections,
        )?;
        log::debug!("wrote {} corrected codeword rows to {}", outcome.report.corrections.len(), seqs_path);
    }

    let output_file_size = std::fs::metadata(&output_filename)?.len();
    report::append_decoding_info(
        std::path::Path::new("DNAcodeX_decoding_INFO.csv"),
        file_name,
        &timestamp(),
        outcome.report.errors_corrected,
        outcome.sequence_len,
        outcome.parity_bits_removed,
        outcome.stripped_bits_len,
        output_file_size,
    )?;

    println!("# Input File Name: {}", file_name);
    println!("# Output File Format: {}", file_type);
    println!("# Huffman: {}", huffman_on);
    println!("> Errors corrected: {}", outcome.report.errors_corrected);
    println!("> Data has been decoded and saved in the file: {}", output_filename);

    Ok(())
}

fn run_simulate(cmd: &clap::ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let file_name = cmd.get_one::<String>("input_file").expect(RCH);
    let file_type = cmd.get_one::<String>("type").expect(RCH);
    let rate = *cmd.get_one::<f64>("mutations_rate").expect(RCH);
    let n_sims = *cmd.get_one::<u32>("n_sims").expect(RCH);
    let huffman_on = cmd.get_flag("huffman");

    let kind = PayloadKind::from_type_str(file_type)?;
    let original = std::fs::read(file_name)?;
    let outcome = pipeline::encode(&original, kind, huffman_on)?;

    let report_path = std::path::Path::new("Mutations_simulator_report.csv");
    let mut rng = rand::thread_rng();
    for run_number in 1..=n_sims {
        let result = simulate::run(&original, &outcome.dna, kind, huffman_on, rate, &mut rng)?;
        println!("Run: {}", run_number);
        report::append_simulation_run(
            report_path,
            file_name,
            run_number as usize,
            rate,
            result.mutation_count,
            result.errors_corrected,
            result.perfect_retrieval,
        )?;
    }

    println!("> Completed {} simulation run(s) at mutation rate {}", n_sims, rate);
    println!("> Report written to {}", report_path.display());

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let long_help = "Examples:
---------
Encode:   `dnacodex encode -f photo.jpg -t jpg --huffman -o encoded`
Decode:   `dnacodex decode -f encoded_jpg.txt -t jpg --huffman -o decoded`
Simulate: `dnacodex simulate -f encoded_text.txt -t txt -m 0.01 -n 100`";

    let file_types = ["jpg", "jpeg", "png", "txt", "gz", "txt.gz"];

    let mut main_cmd = Command::new("dnacodex")
        .about("Encode files as DNA base sequences and decode them back")
        .after_long_help(long_help)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .version(crate_version!());

    main_cmd = main_cmd.subcommand(
        Command::new("encode")
            .about("encode a file into a DNA base sequence")
            .arg(arg!(-f --file_name <PATH> "input file path").required(true))
            .arg(arg!(-t --type <TYPE> "payload type").value_parser(file_types).required(true))
            .arg(huffman_flag("enable the Huffman compression stage"))
            .arg(
                arg!(-o --output_filename <NAME> "output base name")
                    .default_value("encoded_data.txt"),
            ),
    );

    main_cmd = main_cmd.subcommand(
        Command::new("decode")
            .about("decode a DNA base sequence back into a file")
            .arg(arg!(-f --file_name <PATH> "encoded input file path").required(true))
            .arg(arg!(-t --type <TYPE> "payload type").value_parser(file_types).required(true))
            .arg(huffman_flag("input was Huffman-compressed"))
            .arg(
                arg!(-o --output_filename <NAME> "output base name")
                    .default_value("decoded_data"),
            ),
    );

    main_cmd = main_cmd.subcommand(
        Command::new("simulate")
            .about("run the single-base-substitution mutation harness")
            .arg(arg!(-f --input_file <PATH> "input file path").required(true))
            .arg(arg!(-m --mutations_rate <RATE> "substitution rate in [0,1]").value_parser(clap::value_parser!(f64)).required(true))
            .arg(huffman_flag("exercise the Huffman-compressed pipeline"))
            .arg(arg!(-t --type <TYPE> "payload type").value_parser(file_types).required(true))
            .arg(arg!(-n --n_sims <N> "number of simulation runs").value_parser(clap::value_parser!(u32)).required(true)),
    );

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("encode") {
        run_encode(cmd)?;
    }
    if let Some(cmd) = matches.subcommand_matches("decode") {
        run_decode(cmd)?;
    }
    if let Some(cmd) = matches.subcommand_matches("simulate") {
        run_simulate(cmd)?;
    }

    Ok(())
}
