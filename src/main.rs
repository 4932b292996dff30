// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{path::Path, process::ExitCode};

use clap::Parser;
use sdparm_rs::{
    catalog::{TransportId, VendorId, pdt},
    cfg::{cli::Cli, logger::init_logger},
    control_block::mode_sense::ALL_MPAGES,
    engine::{
        ModeOpts, change, enumerate,
        error::SdparmError,
        inhex_replay,
        pageio::{PageIo, PageIoOpts, log_counters},
        print,
    },
    render::{RenderOpts, Renderer},
    select::{self, Op, PageSelection},
    transport::{ScsiDevice, inhex},
    vpd,
};
use tracing::{debug, error, warn};

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logger(cli.verbose) {
        eprintln!("sdparm: {err}");
        return ExitCode::from(1);
    }
    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            error!("{err}");
            ExitCode::from(err.exit_code() as u8)
        },
    }
}

fn check_contradictions(cli: &Cli) -> Result<(), SdparmError> {
    let writes = cli.set.is_some() || cli.clear.is_some() || cli.defaults;
    if cli.get.is_some() && (cli.set.is_some() || cli.clear.is_some()) {
        return Err(SdparmError::Contradict(
            "--get cannot be combined with --set/--clear".into(),
        ));
    }
    if cli.defaults && (cli.set.is_some() || cli.clear.is_some()) {
        return Err(SdparmError::Contradict(
            "--defaults cannot be combined with --set/--clear".into(),
        ));
    }
    if cli.readonly && writes && !cli.dummy {
        return Err(SdparmError::Contradict(
            "--readonly forbids --set/--clear/--defaults".into(),
        ));
    }
    if cli.inquiry && (writes || cli.get.is_some()) {
        return Err(SdparmError::Contradict(
            "--inquiry pages are read-only".into(),
        ));
    }
    if cli.enumerate && !cli.devices.is_empty() {
        return Err(SdparmError::Contradict(
            "--enumerate does not access devices".into(),
        ));
    }
    Ok(())
}

fn parse_namespaces(
    cli: &Cli,
) -> Result<(Option<TransportId>, Option<VendorId>), SdparmError> {
    let transport = match &cli.transport {
        Some(s) => Some(
            TransportId::parse(s).map_err(|e| SdparmError::Syntax(e.to_string()))?,
        ),
        None => None,
    };
    let vendor = match &cli.vendor {
        Some(s) => {
            Some(VendorId::parse(s).map_err(|e| SdparmError::Syntax(e.to_string()))?)
        },
        None => None,
    };
    Ok((transport, vendor))
}

fn render_opts(cli: &Cli) -> RenderOpts {
    RenderOpts {
        json: cli.json,
        quiet: cli.quiet,
        long: cli.long,
        hex: cli.hex,
        inner_hex: cli.inner_hex,
    }
}

fn mode_opts(cli: &Cli, pdt: i8, t: Option<TransportId>, v: Option<VendorId>) -> ModeOpts {
    ModeOpts {
        pdt,
        transport: t,
        vendor: v,
        flexible: cli.flexible,
        all: cli.all > 0 || cli.long,
        long: cli.long,
        num_desc: cli.num_desc,
        dummy: cli.dummy,
        save: cli.save,
    }
}

fn flush_renderer(rend: Renderer) {
    if rend.opts.json {
        let tree = rend.into_json();
        match serde_json::to_string_pretty(&tree) {
            Ok(s) => println!("{s}"),
            Err(err) => error!("JSON serialization failed: {err}"),
        }
    } else {
        for line in rend.lines() {
            println!("{line}");
        }
    }
}

fn run(cli: &Cli) -> Result<u8, SdparmError> {
    check_contradictions(cli)?;
    let (transport, vendor) = parse_namespaces(cli)?;
    let mut rend = Renderer::new(render_opts(cli));

    if cli.enumerate {
        let opts = mode_opts(cli, pdt::ANY, transport, vendor);
        if cli.inquiry {
            enumerate::enumerate_vpd_pages(&mut rend);
        } else {
            enumerate::enumerate_mode_pages(&mut rend, &opts);
            if cli.long {
                enumerate::enumerate_namespaces(&mut rend);
            }
        }
        flush_renderer(rend);
        return Ok(0);
    }

    if let Some(path) = &cli.inhex {
        let data = inhex::read_hex_file(path).map_err(|e| {
            SdparmError::File(std::io::Error::other(e.to_string()))
        })?;
        run_inhex(cli, transport, vendor, &data, &mut rend)?;
        flush_renderer(rend);
        return Ok(0);
    }

    if cli.devices.is_empty() {
        return Err(SdparmError::Syntax(
            "no device given (see --help; --enumerate needs none)".into(),
        ));
    }

    let mut first_code: u8 = 0;
    for dev_path in &cli.devices {
        match run_device(cli, transport, vendor, dev_path, &mut rend) {
            Ok(()) => {},
            Err(err) => {
                error!("{}: {err}", dev_path.display());
                if cli.verbose > 0
                    && let Some(sense) = err.sense()
                {
                    error!("raw sense:\n{}", sdparm_rs::utils::hex_dump(&sense.raw));
                }
                let code = err.exit_code() as u8;
                // First failure sets the process code; suppressed
                // categories only count when nothing else failed.
                if first_code == 0 && !err.is_suppressible() {
                    first_code = code;
                }
            },
        }
    }
    flush_renderer(rend);
    Ok(first_code)
}

fn run_inhex(
    cli: &Cli,
    transport: Option<TransportId>,
    vendor: Option<VendorId>,
    data: &[u8],
    rend: &mut Renderer,
) -> Result<(), SdparmError> {
    if cli.inquiry {
        return vpd::decode_vpd(data, pdt::ANY, false, rend, 0);
    }
    let opts = mode_opts(cli, pdt::ANY, transport, vendor);
    let page_filter = match &cli.page {
        Some(p) => {
            let sel = select::parse_mode_page(p, opts.pdt, transport, vendor)?;
            Some((sel.page_code, sel.subpage_code))
        },
        None => None,
    };
    if let Some(list) = &cli.get {
        let reqs = select::parse_field_list(list, Op::Get, page_filter, transport, vendor)?;
        return inhex_replay::get_inhex_fields(rend, &opts, data, &reqs);
    }
    inhex_replay::print_inhex(rend, &opts, data, page_filter)
}

fn run_device(
    cli: &Cli,
    transport: Option<TransportId>,
    vendor: Option<VendorId>,
    path: &Path,
    rend: &mut Renderer,
) -> Result<(), SdparmError> {
    #[cfg(not(target_os = "linux"))]
    {
        let _ = (cli, transport, vendor, path, rend);
        Err(SdparmError::Transport(
            "device access is only implemented on Linux".into(),
        ))
    }
    #[cfg(target_os = "linux")]
    {
        use sdparm_rs::transport::sg::SgDevice;

        let mut dev = SgDevice::open(path, cli.readonly)
            .map_err(|e| SdparmError::Transport(e.to_string()))?;
        run_open_device(cli, transport, vendor, &mut dev, rend)
    }
}

#[cfg(target_os = "linux")]
fn run_open_device(
    cli: &Cli,
    transport: Option<TransportId>,
    vendor: Option<VendorId>,
    dev: &mut dyn ScsiDevice,
    rend: &mut Renderer,
) -> Result<(), SdparmError> {
    let mut io = PageIo::new(
        dev,
        PageIoOpts {
            six_byte: cli.six,
            dbd: cli.dbd,
            llbaa: cli.llbaa,
            spc_version: 0,
        },
    );
    let inq = io.std_inquiry()?;
    io.opts.spc_version = inq.spc_version();
    let dev_pdt = inq.pdt as i8;
    debug!(
        vendor = %inq.vendor_id,
        product = %inq.product_id,
        pdt = dev_pdt,
        spc = inq.spc_version(),
        "attached"
    );
    if !rend.opts.quiet && !rend.opts.json {
        rend.hr(format!(
            "    {}: {}  {}  {}",
            io.designation(),
            inq.vendor_id,
            inq.product_id,
            inq.product_rev
        ));
    }
    let opts = mode_opts(cli, dev_pdt, transport, vendor);

    let res = if cli.inquiry {
        run_inquiry(cli, &opts, &mut io, &inq, rend)
    } else {
        run_mode(cli, &opts, &mut io, rend)
    };
    log_counters(io.counters());
    res
}

#[cfg(target_os = "linux")]
fn run_inquiry(
    cli: &Cli,
    opts: &ModeOpts,
    io: &mut PageIo<'_>,
    inq: &sdparm_rs::control_block::inquiry::InquiryStandard,
    rend: &mut Renderer,
) -> Result<(), SdparmError> {
    if cli.all >= 2 || (cli.all >= 1 && cli.page.is_none()) {
        // Walk the supported-pages list, taking care never to re-enter
        // page 0x00 itself.
        let sup = io.inquiry_vpd(0x00)?;
        vpd::decode_vpd(&sup, opts.pdt, inq.protect, rend, 0)?;
        for code in vpd::supported_codes(&sup)? {
            if code == 0x00 {
                continue;
            }
            match io.inquiry_vpd(code) {
                Ok(buf) => vpd::decode_vpd(&buf, opts.pdt, inq.protect, rend, 0)?,
                Err(err @ SdparmError::IllegalRequest(_)) => {
                    warn!("VPD page 0x{code:02x} listed but not readable: {err}");
                },
                Err(err) => return Err(err),
            }
        }
        return Ok(());
    }
    let page_code = match &cli.page {
        Some(p) => select::parse_vpd_page(p, opts.pdt)?.page_code,
        None => {
            if cli.long || rend.opts.quiet {
                vpd::decode_std_inquiry(rend, inq);
            }
            0x83
        },
    };
    let buf = io.inquiry_vpd(page_code)?;
    vpd::decode_vpd(&buf, opts.pdt, inq.protect, rend, 0)
}

#[cfg(target_os = "linux")]
fn run_mode(
    cli: &Cli,
    opts: &ModeOpts,
    io: &mut PageIo<'_>,
    rend: &mut Renderer,
) -> Result<(), SdparmError> {
    let page_sel: Option<PageSelection> = match &cli.page {
        Some(p) => Some(select::parse_mode_page(p, opts.pdt, opts.transport, opts.vendor)?),
        None => None,
    };
    let page_ctx = page_sel.map(|s| (s.page_code, s.subpage_code));

    if cli.examine {
        return enumerate::examine_all_pages(rend, opts, io);
    }
    if cli.defaults {
        return match page_ctx {
            Some((p, sp)) => change::restore_page_defaults(rend, opts, io, p, sp),
            None => change::restore_all_defaults(rend, opts, io),
        };
    }
    if let Some(list) = cli.set.as_deref().or(cli.clear.as_deref()) {
        let op = if cli.set.is_some() { Op::Set } else { Op::Clear };
        let reqs =
            select::parse_field_list(list, op, page_ctx, opts.transport, opts.vendor)?;
        return change::change_fields(rend, opts, io, &reqs);
    }
    if let Some(list) = &cli.get {
        let reqs =
            select::parse_field_list(list, Op::Get, page_ctx, opts.transport, opts.vendor)?;
        return print::get_fields(rend, opts, io, &reqs);
    }
    match page_ctx {
        Some((p, sp)) => print::print_pages(rend, opts, io, p, sp),
        None => print::print_pages(rend, opts, io, ALL_MPAGES, 0),
    }
}
