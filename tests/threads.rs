use tensor_accessor::layout::contiguous_strides;
use tensor_accessor::{PackedTensorAccessor, PackedTensorAccessorMut, TensorAccessor, TensorAccessorMut};

#[test]
fn packed_accessor_read_in_worker_threads() {
    let data: Vec<f64> = (0..4 * 8).map(|x| x as f64).collect();
    let packed = {
        // the metadata only lives in this block, the packed accessor outlives it
        let sizes = [4, 8];
        let strides = contiguous_strides(&sizes);
        PackedTensorAccessor::new(&data, &sizes, &strides).unwrap()
    };

    let row_sums: Vec<f64> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|i| s.spawn(move || (0..8).map(|j| packed.select(i)[j]).sum::<f64>()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    let expected: Vec<f64> = (0..4)
        .map(|i| (0..8).map(|j| (i * 8 + j) as f64).sum())
        .collect();
    assert_eq!(row_sums, expected);
}

#[test]
fn packed_accessors_write_disjoint_chunks() {
    const ROWS: usize = 6;
    const COLS: usize = 5;
    let mut data = vec![0u32; ROWS * COLS];
    let sizes = [2, COLS as i64];
    let strides = contiguous_strides(&sizes);

    std::thread::scope(|s| {
        for (chunk_idx, chunk) in data.chunks_mut(2 * COLS).enumerate() {
            let mut packed = PackedTensorAccessorMut::new(chunk, &sizes, &strides).unwrap();
            s.spawn(move || {
                for i in 0..2 {
                    let mut row = packed.select_mut(i);
                    for j in 0..COLS {
                        row[j] = ((chunk_idx * 2 + i) * 100 + j) as u32;
                    }
                }
            });
        }
    });

    for r in 0..ROWS {
        for c in 0..COLS {
            assert_eq!(data[r * COLS + c], (r * 100 + c) as u32);
        }
    }
}

#[test]
fn borrowed_accessor_shared_between_threads() {
    let data: Vec<i32> = (0..24).collect();
    let (sizes, strides) = ([2, 3, 4], [12, 4, 1]);
    let accessor = TensorAccessor::new(&data, &sizes, &strides).unwrap();
    std::thread::scope(|s| {
        for i in 0..2 {
            s.spawn(move || {
                let plane = accessor.select(i);
                for j in 0..3 {
                    for k in 0..4 {
                        assert_eq!(plane.select(j)[k], (i * 12 + j * 4 + k) as i32);
                    }
                }
            });
        }
    });
}

#[test]
fn rank3_element_at_flat_offset() {
    let data: Vec<u64> = (0..24).collect();
    let (sizes, strides) = ([2, 3, 4], [12, 4, 1]);
    let accessor = TensorAccessor::new(&data, &sizes, &strides).unwrap();
    let row = accessor.select(1).select(2);
    let elem = &row[3];
    // 1 * 12 + 2 * 4 + 3 * 1
    assert!(std::ptr::eq(elem, &data[23]));
    assert_eq!(*elem, 23);

    let packed = PackedTensorAccessor::new(&data, &sizes, &strides).unwrap();
    assert!(std::ptr::eq(&packed.select(1).select(2)[3], &data[23]));
}

#[test]
fn rank1_write_through_element_reference() {
    let mut data = [10, 20, 30, 40, 50];
    let (sizes, strides) = ([5], [1]);
    {
        let mut accessor = TensorAccessorMut::new(&mut data, &sizes, &strides).unwrap();
        assert_eq!(accessor[3], 40);
        let elem: &mut i32 = &mut accessor[3];
        *elem = 60;
    }
    assert_eq!(data, [10, 20, 30, 60, 50]);

    let mut packed = PackedTensorAccessorMut::new(&mut data, &sizes, &strides).unwrap();
    packed[0] = 0;
    assert_eq!(data, [0, 20, 30, 60, 50]);
}

#[test]
fn packed_keeps_metadata_after_source_changes() {
    let data: Vec<i32> = (0..24).collect();
    let mut sizes = [2, 3, 4];
    let mut strides = [12, 4, 1];
    let packed = PackedTensorAccessor::new(&data, &sizes, &strides).unwrap();

    sizes[0] = 1;
    strides[2] = 2;
    let accessor = TensorAccessor::new(&data, &sizes, &strides).unwrap();

    assert_eq!(packed.sizes(), &[2, 3, 4]);
    assert_eq!(packed.strides(), &[12, 4, 1]);
    assert_eq!(accessor.sizes(), &[1, 3, 4]);
    assert_eq!(accessor.strides(), &[12, 4, 2]);
    assert_eq!(packed[[0, 1, 3]], 7);
    assert_eq!(accessor[[0, 1, 3]], 10);
}
