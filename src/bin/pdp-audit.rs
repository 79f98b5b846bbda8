//! Command-line harness for the PDP audit round trip
//!
//! Drives the library end to end over files: derive keys, tag a block,
//! issue a challenge, produce a proof and verify it. All objects travel
//! as the library's Base64 string forms, so the subcommands compose
//! over plain shell pipes.

use std::fs::{self, File};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rand::rngs::OsRng;
use tracing::{error, info};

use pdp::{
    gen_chal, gen_chal_with_seed, gen_tag, generate_private_params, marshal_tag, parse_tag, prove,
    verify_proof, Chal, CurvePoint, PrivateParams, Proof, PublicParams, TypeAParams,
};

#[derive(Parser)]
#[command(name = "pdp-audit", about = "Provable Data Possession audit tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Derive private and public parameters from a secret file
    Keygen {
        /// File holding the caller secret (e.g. a device key)
        #[arg(long)]
        secret: PathBuf,
        /// Where to write the private parameter string
        #[arg(long)]
        priv_out: PathBuf,
        /// Where to write the public parameter string
        #[arg(long)]
        pub_out: PathBuf,
    },
    /// Tag a data block
    Tag {
        /// File holding the private parameter string
        #[arg(long)]
        private: PathBuf,
        /// File holding the public parameter string
        #[arg(long)]
        public: PathBuf,
        /// Block index
        #[arg(long)]
        index: String,
        /// Data block file
        #[arg(long)]
        data: PathBuf,
    },
    /// Issue a challenge for a block index
    Chal {
        /// Block index
        #[arg(long)]
        index: String,
        /// Optional seed for a deterministic challenge
        #[arg(long)]
        seed: Option<String>,
    },
    /// Answer a challenge
    Prove {
        /// File holding the public parameter string
        #[arg(long)]
        public: PathBuf,
        /// Challenge string
        #[arg(long)]
        chal: String,
        /// Tag string
        #[arg(long)]
        tag: String,
        /// Data block file
        #[arg(long)]
        data: PathBuf,
    },
    /// Verify a proof
    Verify {
        /// File holding the public parameter string
        #[arg(long)]
        public: PathBuf,
        /// Challenge string
        #[arg(long)]
        chal: String,
        /// Proof string
        #[arg(long)]
        proof: String,
    },
    /// Parse and validate a Type-A parameter file
    CheckParams {
        /// Parameter file (`key value` pairs, one per line)
        #[arg(long)]
        file: PathBuf,
    },
    /// Run random round trips against in-memory data
    Demo {
        /// Number of rounds
        #[arg(long, default_value_t = 4)]
        rounds: usize,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match cli.command {
        Command::Keygen {
            secret,
            priv_out,
            pub_out,
        } => {
            let secret = fs::read(&secret)?;
            let sp = generate_private_params(&secret)?;
            let u = CurvePoint::random(&mut OsRng)?;
            let pp = sp.generate_public_params(u)?;
            fs::write(&priv_out, sp.marshal())?;
            fs::write(&pub_out, pp.marshal())?;
            info!(
                "wrote private params to {} and public params to {}",
                priv_out.display(),
                pub_out.display()
            );
        }
        Command::Tag {
            private,
            public,
            index,
            data,
        } => {
            let sp = PrivateParams::parse(fs::read_to_string(&private)?.trim())?;
            let pp = PublicParams::parse(fs::read_to_string(&public)?.trim())?;
            let mut reader = File::open(&data)?;
            let tag = gen_tag(&sp, &pp, index.as_bytes(), &mut reader)?;
            println!("{}", marshal_tag(&tag));
        }
        Command::Chal { index, seed } => {
            let chal = match seed {
                Some(seed) => gen_chal_with_seed(index.as_bytes(), seed.as_bytes()),
                None => gen_chal(index.as_bytes())?,
            };
            println!("{}", chal.marshal());
        }
        Command::Prove {
            public,
            chal,
            tag,
            data,
        } => {
            let pp = PublicParams::parse(fs::read_to_string(&public)?.trim())?;
            let chal = Chal::parse(&chal)?;
            let tag = parse_tag(&tag)?;
            let mut reader = File::open(&data)?;
            let proof = prove(&pp, &chal, &tag, &mut reader)?;
            println!("{}", proof.marshal());
        }
        Command::Verify {
            public,
            chal,
            proof,
        } => {
            let pp = PublicParams::parse(fs::read_to_string(&public)?.trim())?;
            let chal = Chal::parse(&chal)?;
            let proof = Proof::parse(&proof)?;
            let ok = verify_proof(&pp, &chal, &proof);
            println!("{ok}");
            if !ok {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::CheckParams { file } => {
            let reader = std::io::BufReader::new(File::open(&file)?);
            let params = TypeAParams::parse(reader)?;
            let matches_builtin = params == TypeAParams::builtin();
            info!(
                "parameter set is consistent (q: {} bits, r: {} bits, builtin: {matches_builtin})",
                params.q.bits(),
                params.r.bits()
            );
        }
        Command::Demo { rounds } => {
            use rand::RngCore;
            for round in 0..rounds {
                let mut secret = [0u8; 32];
                OsRng.try_fill_bytes(&mut secret)?;
                let mut data = vec![0u8; 4096];
                OsRng.try_fill_bytes(&mut data)?;

                let sp = generate_private_params(&secret)?;
                let u = CurvePoint::random(&mut OsRng)?;
                let pp = sp.generate_public_params(u)?;

                let idx = round.to_string();
                let tag = gen_tag(&sp, &pp, idx.as_bytes(), &mut data.as_slice())?;
                let chal = gen_chal(idx.as_bytes())?;
                let proof = prove(&pp, &chal, &tag, &mut data.as_slice())?;

                if verify_proof(&pp, &chal, &proof) {
                    info!("round {round} passed");
                } else {
                    error!("round {round} failed");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
