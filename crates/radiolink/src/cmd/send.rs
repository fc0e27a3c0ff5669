use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use radiolink_device::{DeviceRegistry, LoopbackRadio};
use radiolink_frame::decode_frame;
use radiolink_transport::{MsgChain, ServerDescriptor, TransportContext, TransportRegistry};

use crate::cmd::SendArgs;
use crate::exit::{
    device_error, frame_error, transport_error, CliError, CliResult, INTERNAL, SUCCESS, USAGE,
};
use crate::output::{hex_string, print_report, FrameView, OutputFormat, TransmitReport};

const LOOPBACK_DEVICE: &str = "loop0";

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let server = parse_server(&args.server)?;
    let header = parse_hex(&args.header)?;
    let payload = resolve_payload(&args)?;

    let devices = Arc::new(DeviceRegistry::new());
    let radio = LoopbackRadio::with_frame_len(args.frame_len);
    let log = radio.log();
    devices
        .insert(LOOPBACK_DEVICE, Box::new(radio))
        .map_err(|err| device_error("device setup failed", err))?;

    let transports = TransportRegistry::new();
    let ctx = TransportContext::register(devices, &transports, LOOPBACK_DEVICE, server)
        .map_err(|err| transport_error("registration failed", err))?;

    let mut chain = MsgChain::with_header(Bytes::from(header));
    chain.push_segment(Bytes::from(payload));
    chain.set_endpoint(ctx.server_endpoint());

    let sent = transports
        .transmit(chain)
        .map_err(|err| transport_error("transmit failed", err))?;

    let report = TransmitReport {
        device: ctx.device_name().to_string(),
        server: ctx.server().to_string(),
        payload_bytes: sent,
        frame_count: log.len(),
        frames: frame_views(log.snapshot())?,
    };
    print_report(&report, format);

    Ok(SUCCESS)
}

fn frame_views(raw: Vec<Vec<u8>>) -> CliResult<Vec<FrameView>> {
    raw.into_iter()
        .map(|bytes| {
            let hex = hex_string(&bytes);
            let mut buf = BytesMut::from(bytes.as_slice());
            let frame = decode_frame(&mut buf)
                .map_err(|err| frame_error("captured frame is malformed", err))?
                .ok_or_else(|| CliError::new(INTERNAL, "captured frame is truncated"))?;
            Ok(FrameView {
                seq: frame.seq,
                more: frame.more,
                len: frame.payload.len(),
                hex,
            })
        })
        .collect()
}

fn resolve_payload(args: &SendArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(hex) = &args.hex {
        return parse_hex(hex);
    }
    Ok(Vec::new())
}

fn parse_server(input: &str) -> CliResult<ServerDescriptor> {
    let (host, port) = input
        .split_once(':')
        .ok_or_else(|| CliError::new(USAGE, format!("server must be HOST:PORT, got {input:?}")))?;
    Ok(ServerDescriptor::new(parse_u16(host)?, parse_u16(port)?))
}

fn parse_u16(input: &str) -> CliResult<u16> {
    let parsed = match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|_| CliError::new(USAGE, format!("invalid address component: {input:?}")))
}

fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let input = input.trim();
    if input.len() % 2 != 0 {
        return Err(CliError::new(
            USAGE,
            "hex input must have an even number of digits",
        ));
    }
    (0..input.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&input[i..i + 2], 16)
                .map_err(|_| CliError::new(USAGE, format!("invalid hex byte at offset {i}")))
        })
        .collect()
}
