use termquant::{
    build_palette, codec, convert, dither, init_accelerator, ConvertOptions, DeviceSelector,
    DitherMode, Error, Image, PaletteAlgorithm,
};

fn image_of(colors: &[[u8; 3]], width: usize, height: usize) -> Image {
    let pixels: Vec<rgb::RGB<u8>> = colors
        .iter()
        .map(|c| rgb::RGB {
            r: c[0],
            g: c[1],
            b: c[2],
        })
        .collect();
    Image::from_pixels(&pixels, width, height).unwrap()
}

fn gradient(width: usize, height: usize) -> Image {
    let pixels: Vec<rgb::RGB<u8>> = (0..height)
        .flat_map(|y| {
            (0..width).map(move |x| rgb::RGB {
                r: (x * 255 / width) as u8,
                g: (y * 255 / height) as u8,
                b: 128,
            })
        })
        .collect();
    Image::from_pixels(&pixels, width, height).unwrap()
}

#[test]
fn smoke_test_default_pipeline() {
    let image = gradient(32, 32);
    let (palette, indexed) = convert(&image, &ConvertOptions::default()).unwrap();

    assert_eq!(palette.len(), 16);
    assert_eq!(indexed.width(), 32);
    assert_eq!(indexed.height(), 32);
    for &idx in indexed.indices() {
        assert!((idx as usize) < palette.len());
    }
}

#[test]
fn every_builder_returns_exact_count() {
    let image = gradient(24, 24);
    for (algo, count) in [
        (PaletteAlgorithm::MedianCut, 8),
        (PaletteAlgorithm::KMeans, 11),
        (PaletteAlgorithm::Octree, 11),
    ] {
        let palette = build_palette(&image, count, algo).unwrap();
        assert_eq!(palette.len(), count, "{algo:?}");
    }
}

#[test]
fn median_cut_rejects_non_power_of_two() {
    let image = gradient(8, 8);
    assert_eq!(
        build_palette(&image, 6, PaletteAlgorithm::MedianCut).unwrap_err(),
        Error::NonPowerOfTwoCount(6)
    );
}

#[test]
fn every_quantizer_stays_in_range() {
    let image = gradient(16, 16);
    let palette = build_palette(&image, 4, PaletteAlgorithm::MedianCut).unwrap();
    for mode in [
        DitherMode::Threshold,
        DitherMode::Ordered,
        DitherMode::FloydSteinberg,
    ] {
        let indexed = dither::quantize(&image, &palette, mode).unwrap();
        assert_eq!(indexed.indices().len(), 256);
        for &idx in indexed.indices() {
            assert!((idx as usize) < palette.len(), "{mode:?}");
        }
    }
}

#[test]
fn floyd_steinberg_runs_are_reproducible() {
    let image = gradient(48, 48);
    let palette = build_palette(&image, 16, PaletteAlgorithm::KMeans).unwrap();
    let a = dither::floyd_steinberg(&image, &palette).unwrap();
    let b = dither::floyd_steinberg(&image, &palette).unwrap();
    assert_eq!(a.indices(), b.indices());
}

#[test]
fn perceptual_pipeline_returns_srgb_palette() {
    let image = gradient(16, 16);
    let options = ConvertOptions {
        perceptual: true,
        palette: PaletteAlgorithm::KMeans,
        colors: 8,
        dither: DitherMode::Threshold,
    };
    let (palette, indexed) = convert(&image, &options).unwrap();
    assert_eq!(palette.space(), termquant::ColorSpace::Srgb);
    assert_eq!(palette.len(), 8);
    // An sRGB palette straight from the pipeline is codec-ready.
    let (bytes, _) = codec::encode(&indexed, &palette, codec::Format::Raw, None).unwrap();
    let (decoded, _, _) = codec::decode(&bytes, codec::Format::Raw, None).unwrap();
    assert_eq!(decoded, indexed);
}

// Spec scenario: four distinct saturated colors, median cut to 4, threshold
// quantize. Each pixel gets its own palette entry and the raw frame is
// header (5) + palette (12) + indices (4) bytes.
#[test]
fn four_color_end_to_end() {
    let image = image_of(
        &[[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 0]],
        2,
        2,
    );
    let palette = build_palette(&image, 4, PaletteAlgorithm::MedianCut).unwrap();
    let indexed = dither::threshold(&image, &palette).unwrap();

    let mut seen = [false; 4];
    for (i, c) in [[255u8, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 0]]
        .iter()
        .enumerate()
    {
        let idx = indexed.indices()[i] as usize;
        assert!(idx < 4);
        assert!(!seen[idx], "palette index {idx} used twice");
        seen[idx] = true;
        assert_eq!(palette.color(idx as u8).to_rgb8(), *c);
    }

    let (bytes, _) = codec::encode(&indexed, &palette, codec::Format::Raw, None).unwrap();
    assert_eq!(bytes.len(), 5 + 4 * 3 + 4);
}

// Spec scenario: an all-black image, k-means with two clusters. Reseeding
// must neither crash nor hang, and both entries collapse to black.
#[test]
fn all_black_kmeans_degenerates_cleanly() {
    let image = image_of(&[[0, 0, 0]; 16], 4, 4);
    let palette = build_palette(&image, 2, PaletteAlgorithm::KMeans).unwrap();
    assert_eq!(palette.len(), 2);
    for i in 0..2 {
        assert_eq!(palette.color(i).to_rgb8(), [0, 0, 0]);
    }
    let indexed = dither::threshold(&image, &palette).unwrap();
    for &idx in indexed.indices() {
        assert!(idx < 2);
    }
}

#[test]
fn accelerator_init_fails_soft() {
    for selector in [
        DeviceSelector::Index(3),
        DeviceSelector::BestFlops,
        DeviceSelector::BestMemory,
    ] {
        assert!(!init_accelerator(selector));
    }
    // CPU path keeps producing results after a failed init.
    let image = gradient(8, 8);
    let palette = build_palette(&image, 4, PaletteAlgorithm::Octree).unwrap();
    assert!(dither::threshold(&image, &palette).is_ok());
}

#[test]
fn space_mismatch_is_an_error_everywhere() {
    let image = gradient(8, 8);
    let lab_image = termquant::lab::image_to_lab(&image).unwrap();
    let srgb_palette = build_palette(&image, 4, PaletteAlgorithm::MedianCut).unwrap();

    for mode in [
        DitherMode::Threshold,
        DitherMode::Ordered,
        DitherMode::FloydSteinberg,
    ] {
        assert!(matches!(
            dither::quantize(&lab_image, &srgb_palette, mode),
            Err(Error::ColorSpaceMismatch { .. })
        ));
    }
}

#[test]
fn ordered_dither_is_repeatable() {
    let image = gradient(16, 16);
    let palette = build_palette(&image, 8, PaletteAlgorithm::MedianCut).unwrap();
    let a = dither::ordered(&image, &palette).unwrap();
    let b = dither::ordered(&image, &palette).unwrap();
    assert_eq!(a.indices(), b.indices());
}
