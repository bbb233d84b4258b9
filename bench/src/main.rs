use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Context as _;
use framemix::{
    Frame, KernelTier, PixelFormat, Registry, kernels::clip::clip_placement, opacity_to_alpha,
};
use serde_json::json;
use sha2::Digest as _;

#[derive(Clone, Debug)]
struct BenchArgs {
    width: u32,
    height: u32,
    repeats: u32,
    warmup: u32,
    opacity: f64,
    formats: Option<Vec<PixelFormat>>,
    json_out: Option<PathBuf>,
}

#[derive(Clone, Debug)]
struct TierResult {
    tier: KernelTier,
    blend: Vec<Duration>,
    fill: Vec<Duration>,
    digest: String,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let args = parse_args()?;

    if args.width == 0 || args.height == 0 {
        anyhow::bail!("--width/--height must be > 0");
    }
    if args.repeats == 0 {
        anyhow::bail!("--repeats must be > 0");
    }

    let scalar = Registry::with_tier(KernelTier::Scalar);
    let vector = Registry::probe(framemix::KernelPreference::Auto);
    eprintln!(
        "canvas {}x{}, {} repeat(s), best tier {}",
        args.width,
        args.height,
        args.repeats,
        vector.caps().best_tier()
    );

    let formats: Vec<PixelFormat> = match &args.formats {
        Some(f) => f.clone(),
        None => scalar.iter().map(|d| d.format()).collect(),
    };

    let mut report = Vec::new();
    for format in formats {
        let mut tiers = Vec::new();
        for reg in [&scalar, &vector] {
            tiers.push(bench_format(reg, format, &args)?);
        }
        if tiers[0].digest != tiers[1].digest {
            anyhow::bail!(
                "{format}: {} and {} kernels disagree ({} vs {})",
                tiers[0].tier,
                tiers[1].tier,
                tiers[0].digest,
                tiers[1].digest
            );
        }

        eprintln!("\n{format}:");
        for t in &tiers {
            eprintln!(
                "  {tier:7} blend p50={b50:>10} p90={b90:>10}  fill p50={f50:>10}",
                tier = t.tier.name(),
                b50 = fmt_ms(percentile(&t.blend, 0.50)),
                b90 = fmt_ms(percentile(&t.blend, 0.90)),
                f50 = fmt_ms(percentile(&t.fill, 0.50)),
            );
        }

        report.push(json!({
            "format": format.name(),
            "digest": tiers[0].digest,
            "tiers": tiers.iter().map(|t| json!({
                "tier": t.tier.name(),
                "blend_p50_ms": percentile(&t.blend, 0.50).as_secs_f64() * 1000.0,
                "blend_p90_ms": percentile(&t.blend, 0.90).as_secs_f64() * 1000.0,
                "fill_p50_ms": percentile(&t.fill, 0.50).as_secs_f64() * 1000.0,
            })).collect::<Vec<_>>(),
        }));
    }

    if let Some(path) = &args.json_out {
        let f = std::fs::File::create(path)
            .with_context(|| format!("create json report '{}'", path.display()))?;
        serde_json::to_writer_pretty(f, &json!({
            "width": args.width,
            "height": args.height,
            "repeats": args.repeats,
            "formats": report,
        }))
        .with_context(|| "write json report")?;
        eprintln!("\nwrote {}", path.display());
    }
    Ok(())
}

fn bench_format(reg: &Registry, format: PixelFormat, args: &BenchArgs) -> anyhow::Result<TierResult> {
    let desc = reg.lookup(format)?;
    let (w, h) = (args.width, args.height);
    let (sw, sh) = (w / 2 + 1, h / 2 + 1);

    let mut src = Frame::new(format, sw, sh)?;
    desc.fill_checker(&mut src)?;
    let mut dst = Frame::new(format, w, h)?;

    let a = opacity_to_alpha(args.opacity);
    let rect = clip_placement(
        (w / 4) as i32 + 1,
        (h / 4) as i32 + 1,
        (sw, sh),
        (w, h),
        desc.alignment(),
    )
    .context("bench placement is off canvas")?;

    let mut blend = Vec::with_capacity(args.repeats as usize);
    let mut fill = Vec::with_capacity(args.repeats as usize);
    for i in 0..args.warmup + args.repeats {
        let t = Instant::now();
        desc.fill_color(&mut dst, [16 + (i % 200) as u8, 90, 240])?;
        let t_fill = t.elapsed();

        let t = Instant::now();
        desc.blend(&src, &mut dst, rect, a)?;
        let t_blend = t.elapsed();

        if i >= args.warmup {
            fill.push(t_fill);
            blend.push(t_blend);
        }
    }

    blend.sort();
    fill.sort();
    Ok(TierResult {
        tier: desc.tier(),
        blend,
        fill,
        digest: sha256_hex(dst.data()),
    })
}

fn percentile(v: &[Duration], p: f64) -> Duration {
    if v.is_empty() {
        return Duration::ZERO;
    }
    let n = v.len();
    let rank = (p * (n as f64)).ceil().clamp(1.0, n as f64) as usize;
    v[rank - 1]
}

fn fmt_ms(d: Duration) -> String {
    format!("{:.3}ms", d.as_secs_f64() * 1000.0)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

fn parse_args() -> anyhow::Result<BenchArgs> {
    let mut args = std::env::args().skip(1);

    let mut out = BenchArgs {
        width: 1920,
        height: 1080,
        repeats: 50,
        warmup: 2,
        opacity: 0.6,
        formats: None,
        json_out: None,
    };

    while let Some(a) = args.next() {
        match a.as_str() {
            "--width" => out.width = parse_u32(args.next(), "--width")?,
            "--height" => out.height = parse_u32(args.next(), "--height")?,
            "--repeats" => out.repeats = parse_u32(args.next(), "--repeats")?,
            "--warmup" => out.warmup = parse_u32(args.next(), "--warmup")?,
            "--opacity" => {
                let v = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("missing value for --opacity"))?;
                out.opacity = v
                    .parse::<f64>()
                    .with_context(|| format!("parse --opacity value '{v}'"))?;
            }
            "--formats" => {
                let v = args.next().ok_or_else(|| {
                    anyhow::anyhow!("missing value for --formats (comma separated, e.g. AYUV,I420)")
                })?;
                let list = v
                    .split(',')
                    .map(|s| s.trim().parse::<PixelFormat>())
                    .collect::<Result<Vec<_>, _>>()?;
                out.formats = Some(list);
            }
            "--json" => {
                out.json_out = Some(PathBuf::from(args.next().ok_or_else(|| {
                    anyhow::anyhow!("missing value for --json (expected a path)")
                })?))
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => anyhow::bail!("unknown arg '{a}' (try --help)"),
        }
    }

    Ok(out)
}

fn print_help() {
    eprintln!(
        r#"framemix-bench

Times the scalar and best available blend/fill kernels per pixel format and checks that both
produce identical frames.

Usage:
  cargo run -q --release
  cargo run -q --release -- --width 1280 --height 720 --formats AYUV,I420,UYVY

Args:
  --width N        (default 1920)
  --height N       (default 1080)
  --repeats N      (default 50)
  --warmup N       (default 2)
  --opacity F      (default 0.6)
  --formats LIST   (default: every registered format)
  --json PATH      write a JSON summary
"#
    );
}

fn parse_u32(v: Option<String>, flag: &str) -> anyhow::Result<u32> {
    let v = v.ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))?;
    v.parse::<u32>()
        .with_context(|| format!("parse {flag} value '{v}'"))
}
